//! Small quick-xml helpers shared by the part parsers.
use crate::ooxml::error::Result;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, BytesText};

/// Append a text event's content.
#[inline]
pub(crate) fn push_text(out: &mut String, text: &BytesText<'_>) -> Result<()> {
    out.push_str(std::str::from_utf8(text.as_ref())?);
    Ok(())
}

/// Append the character an entity reference (`&amp;`, `&#38;`, `&#x26;`) stands for.
///
/// Unknown entities are kept verbatim.
pub(crate) fn push_entity(out: &mut String, entity: &BytesRef<'_>) -> Result<()> {
    let name = std::str::from_utf8(entity.as_ref())?;
    if let Some(resolved) = resolve_predefined_entity(name) {
        out.push_str(resolved);
        return Ok(());
    }

    let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(dec) = name.strip_prefix('#') {
        dec.parse::<u32>().ok()
    } else {
        None
    };

    match code.and_then(char::from_u32) {
        Some(ch) => out.push(ch),
        None => {
            out.push('&');
            out.push_str(name);
            out.push(';');
        },
    }
    Ok(())
}

/// Value of the attribute with the given local name, ignoring any prefix.
pub(crate) fn attr(e: &BytesStart<'_>, local: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == local {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Value of a prefixed attribute such as `r:id` or `r:embed`.
///
/// The relationship namespace is bound to `r` in every PresentationML part, but
/// unprefixed attributes with the same local name (`id` on `p:sldId`) must not match.
pub(crate) fn prefixed_attr(e: &BytesStart<'_>, local: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.prefix().is_some() && attr.key.local_name().as_ref() == local {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::Reader;
    use quick_xml::events::Event;

    fn text_of(xml: &str) -> String {
        let mut reader = Reader::from_str(xml);
        let mut out = String::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Text(t) => push_text(&mut out, &t).unwrap(),
                Event::GeneralRef(r) => push_entity(&mut out, &r).unwrap(),
                Event::Eof => break,
                _ => {},
            }
        }
        out
    }

    #[test]
    fn test_entities() {
        assert_eq!(text_of("<t>Q&amp;A &lt;1&gt;</t>"), "Q&A <1>");
        assert_eq!(text_of("<t>&#38;&#x41;</t>"), "&A");
        assert_eq!(text_of("<t>&nbsp;</t>"), "&nbsp;");
    }

    #[test]
    fn test_prefixed_attr() {
        let mut reader = Reader::from_str(r#"<p:sldId id="256" r:id="rId2"/>"#);
        let Event::Empty(e) = reader.read_event().unwrap() else {
            panic!("expected empty element");
        };
        assert_eq!(attr(&e, b"id").unwrap().as_deref(), Some("256"));
        assert_eq!(prefixed_attr(&e, b"id").unwrap().as_deref(), Some("rId2"));
    }
}
