//! # Composite Key Codec
//!
//! Encodes a tuple of string fields into one ordered, prefix-scannable
//! world-state key, and back. The layout is:
//!
//! ```text
//! 0x00 <object type> 0x00 <field 1> 0x00 <field 2> 0x00 ... <field n> 0x00
//! ```
//!
//! Every component — the object type and each field — is terminated by the
//! `0x00` delimiter, and the delimiter byte is forbidden inside components.
//! Termination is what makes partial keys safe scan prefixes: the prefix
//! for color `"blue"` ends in `blue\0`, which can never be a byte prefix of
//! an entry for color `"bluegreen"` (`bluegreen\0...`). The leading `0x00`
//! keeps every composite key outside the plain-record keyspace, so record
//! scans and index scans can never collide.

use crate::error::{LedgerError, Result};

/// Byte that separates components inside a composite key. Must not appear
/// inside the object type or any field value.
pub const DELIMITER: u8 = 0x00;

/// Encode a full composite key for `object_type` over `fields`.
///
/// # Errors
///
/// Returns [`LedgerError::MalformedKey`] when `fields` is empty, when the
/// object type is empty, or when any component contains the delimiter byte.
pub fn encode(object_type: &str, fields: &[&str]) -> Result<Vec<u8>> {
    if fields.is_empty() {
        return Err(LedgerError::MalformedKey(
            "composite key requires at least one field".into(),
        ));
    }
    encode_prefix(object_type, fields)
}

/// Encode a scan prefix for `object_type` over a leading subset of fields.
///
/// With an empty `fields` slice this yields the prefix matching every entry
/// of the object type. A prefix built from `k` fields matches exactly the
/// keys whose first `k` fields equal them — never a key whose field merely
/// starts with the same characters.
///
/// # Errors
///
/// Returns [`LedgerError::MalformedKey`] when the object type is empty or
/// any component contains the delimiter byte.
pub fn encode_prefix(object_type: &str, fields: &[&str]) -> Result<Vec<u8>> {
    if object_type.is_empty() {
        return Err(LedgerError::MalformedKey("empty object type".into()));
    }

    let mut key = Vec::with_capacity(
        2 + object_type.len() + fields.iter().map(|f| f.len() + 1).sum::<usize>(),
    );
    key.push(DELIMITER);
    push_component(&mut key, object_type)?;
    for field in fields {
        push_component(&mut key, field)?;
    }
    Ok(key)
}

/// Decode a composite key into its object type and field values.
///
/// Exact inverse of [`encode`]: decoding an encoded key yields the original
/// components.
///
/// # Errors
///
/// Returns [`LedgerError::MalformedKey`] when the leading delimiter is
/// missing, a component is unterminated, the object type is empty, no
/// fields are present, or a component is not valid UTF-8.
pub fn decode(key: &[u8]) -> Result<(String, Vec<String>)> {
    if key.first() != Some(&DELIMITER) {
        return Err(LedgerError::MalformedKey(
            "missing leading delimiter".into(),
        ));
    }
    if key.len() < 2 || key.last() != Some(&DELIMITER) {
        return Err(LedgerError::MalformedKey(
            "unterminated trailing component".into(),
        ));
    }

    // Strip the leading and final delimiter; what remains is
    // `type 0x00 field 0x00 ... 0x00 field`.
    let body = &key[1..key.len() - 1];
    let mut components = body.split(|b| *b == DELIMITER).map(|raw| {
        String::from_utf8(raw.to_vec())
            .map_err(|_| LedgerError::MalformedKey("component is not valid UTF-8".into()))
    });

    let object_type = components
        .next()
        .transpose()?
        .filter(|t| !t.is_empty())
        .ok_or_else(|| LedgerError::MalformedKey("empty object type".into()))?;

    let fields = components.collect::<Result<Vec<String>>>()?;
    if fields.is_empty() {
        return Err(LedgerError::MalformedKey(
            "composite key carries no fields".into(),
        ));
    }

    Ok((object_type, fields))
}

fn push_component(key: &mut Vec<u8>, component: &str) -> Result<()> {
    if component.as_bytes().contains(&DELIMITER) {
        return Err(LedgerError::MalformedKey(format!(
            "component {component:?} contains the delimiter byte",
        )));
    }
    key.extend_from_slice(component.as_bytes());
    key.push(DELIMITER);
    Ok(())
}
