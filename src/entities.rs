//! Character reference decoding for text and attribute values.

use std::borrow::Cow;

use quick_xml::escape::{resolve_html5_entity, unescape_with};

/// Decode XML, numeric, and HTML5 named character references.
///
/// Text that cannot be decoded (an unknown entity, a dangling `&`) is returned
/// unchanged; decoding never fails.
pub fn decode_entities(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }
    match unescape_with(raw, resolve_html5_entity) {
        Ok(decoded) => decoded,
        Err(err) => {
            log::trace!("Leaving text undecoded: {:?}", err);
            decode_known_references(raw)
        }
    }
}

/// Resolve a single reference name (the part between `&` and `;`).
pub fn resolve_reference(name: &str) -> Option<Cow<'static, str>> {
    if let Some(numeric) = name.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        if code == 0 {
            return None;
        }
        return char::from_u32(code).map(|ch| Cow::Owned(ch.to_string()));
    }
    resolve_html5_entity(name).map(Cow::Borrowed)
}

/// Slow path: decode each well-formed reference on its own and keep every
/// unresolvable `&...` sequence verbatim.
fn decode_known_references(raw: &str) -> Cow<'_, str> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let resolved = tail[1..].find(';').and_then(|end| {
            let name = &tail[1..1 + end];
            resolve_reference(name).map(|text| (text, end + 2))
        });
        match resolved {
            Some((text, consumed)) => {
                out.push_str(&text);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}
