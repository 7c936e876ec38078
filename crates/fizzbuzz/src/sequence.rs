//! The generation loop.

use std::io::Write;

use crate::config::Options;
use crate::error::{FizzbuzzError, Result};

/// Write the sequence described by `options` into `w`.
///
/// For every number in `from..=to`, the fizz token is written when the number is a
/// multiple of the fizz rule, then the buzz token when it is a multiple of the buzz
/// rule. A number matching neither rule is written in decimal. Items are joined by
/// the separator.
pub fn write<W: Write>(w: &mut W, options: &Options) -> Result<()> {
    validate(options)?;

    for i in options.from..=options.to {
        let mut is_number = true;
        if i % options.fizz.multiple == 0 {
            emit(w, options.fizz.token.as_bytes(), "fizz", i)?;
            is_number = false;
        }
        if i % options.buzz.multiple == 0 {
            emit(w, options.buzz.token.as_bytes(), "buzz", i)?;
            is_number = false;
        }
        if is_number {
            emit(w, i.to_string().as_bytes(), "number", i)?;
        }

        if i != options.to {
            emit(w, options.separator.as_bytes(), "separator", i)?;
        }
    }
    Ok(())
}

/// Generate the whole sequence as a `String`.
pub fn to_string(options: &Options) -> Result<String> {
    let mut buf = Vec::new();
    write(&mut buf, options)?;
    // Every piece written is either a `String` or a formatted integer.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn validate(options: &Options) -> Result<()> {
    if options.from <= 0 {
        return Err(FizzbuzzError::InvalidFrom(options.from));
    }
    if options.to <= 0 {
        return Err(FizzbuzzError::InvalidTo(options.to));
    }
    if options.fizz.multiple <= 0 {
        return Err(FizzbuzzError::InvalidMultiple {
            rule: "fizz",
            multiple: options.fizz.multiple,
        });
    }
    if options.buzz.multiple <= 0 {
        return Err(FizzbuzzError::InvalidMultiple {
            rule: "buzz",
            multiple: options.buzz.multiple,
        });
    }
    Ok(())
}

fn emit<W: Write>(w: &mut W, bytes: &[u8], what: &'static str, index: i64) -> Result<()> {
    w.write_all(bytes)
        .map_err(|source| FizzbuzzError::Write { what, index, source })
}
