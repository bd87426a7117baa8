//! Validate-then-load, convert and export operations.
//!
//! Every operation takes the caller's [`ConverterConfig`] and owns the sinks
//! it writes to for the duration of the call.

use std::path::Path;

use log::{debug, info, warn};

use crate::buffer::{BufferRouter, ReadBack};
use crate::config::ConverterConfig;
use crate::convert::{TabularData, TabularEngine};
use crate::detect::FormatValidator;
use crate::error::{ConvertError, Result};
use crate::format::{extract_extension, trailing_token, Format};

/// Validate `path` against its declared extension, then load it.
///
/// A name without an extension, an unknown extension or a rejected file stops
/// the load before any parser runs.
pub fn load_file<P: AsRef<Path>>(
    path: P,
    validator: &FormatValidator,
    config: &ConverterConfig,
) -> Result<TabularData> {
    let path = path.as_ref();
    let name = path.to_string_lossy();

    let extension = extract_extension(&name)?;
    let format = Format::from_token(&extension)?;
    debug!("declared format of {} is {}", name, format);

    if let Some(err) = validator.verdict_for(format, path)?.into_error(&name) {
        warn!("rejected {}: {}", name, err);
        return Err(err);
    }

    let data = TabularEngine::with_config(config.clone()).load(path, format)?;
    info!("loaded {} ({} rows, {} columns)", name, data.row_count, data.column_count());
    Ok(data)
}

/// Serialize a loaded dataset into the sink that `format` selects.
///
/// Fails with [`ConvertError::TypeMismatch`] when nothing was loaded.
pub fn convert_to_buffer(
    data: Option<&TabularData>,
    format: Format,
    router: &mut BufferRouter,
    config: &ConverterConfig,
) -> Result<()> {
    let data = data.ok_or_else(|| {
        ConvertError::TypeMismatch(format!("nothing to convert to {}", format))
    })?;
    TabularEngine::with_config(config.clone()).serialize(data, format, router)
}

/// Load `path`, convert it to `format` in fresh buffers and read the result back.
pub fn show<P: AsRef<Path>>(path: P, format: Format, config: &ConverterConfig) -> Result<ReadBack> {
    let data = load_file(path, &FormatValidator::new(), config)?;
    let mut router = BufferRouter::with_encoding(&config.buffer_encoding)?;
    convert_to_buffer(Some(&data), format, &mut router, config)?;
    router.read_back(format)
}

/// Export a loaded dataset to `path` as `format`.
///
/// The trailing letters of `path` must equal the format token; a mismatch
/// fails with [`ConvertError::FormatMismatch`] before anything is written.
pub fn export_file<P: AsRef<Path>>(
    data: Option<&TabularData>,
    format: Format,
    path: P,
    config: &ConverterConfig,
) -> Result<()> {
    let path = path.as_ref();
    let found = trailing_token(&path.to_string_lossy())?;
    if found != format.token() {
        return Err(ConvertError::FormatMismatch {
            expected: format.token().to_string(),
            found,
        });
    }

    let data = data.ok_or_else(|| {
        ConvertError::TypeMismatch(format!("nothing to export to {}", format))
    })?;
    TabularEngine::with_config(config.clone()).serialize_to_file(data, format, path)
}
