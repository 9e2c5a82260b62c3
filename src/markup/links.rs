//! # Link Condensing
//!
//! Module markup encodes cross-references as anchors whose attributes carry
//! an action keyword, a sub-type and a target value:
//!
//! ```text
//! <a href="passagestudy.jsp?action=showStrongs&type=Greek&value=25">love</a>
//! ```
//!
//! The display layer only needs those three fields, so each anchor is
//! rewritten into a condensed form whose href packs them with `_`:
//!
//! ```text
//! <a href="showStrongs_Greek_25">love</a>
//! ```
//!
//! On click, [`LinkTarget::from_href`] splits the href back into its fields.
//! A `_` or `%` inside a field is percent-encoded so the split stays exact.

use std::fmt;

use log::debug;
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use serde::Serialize;

use super::MarkupError;
use super::scan::{field_after, find_anchor_open, find_from};

/// Separator between the three fields of a condensed href.
pub const FIELD_DELIMITER: &str = "_";

const ANCHOR_CLOSE: &str = "</a>";

const FIELD_ESCAPES: &AsciiSet = &CONTROLS
    .add(b'_')
    .add(b'%')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b' ');

/// Bytes that end an unquoted `action=`, `type=` or `value=` field. The `"`
/// closes the enclosing `href`, whichever key comes last.
const FIELD_END: &[u8] = b"&\"";

/// The pieces of one source anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorFields<'a> {
    pub action: &'a str,
    pub kind: &'a str,
    pub value: &'a str,
    pub label: &'a str,
}

impl AnchorFields<'_> {
    pub fn condense(&self) -> CondensedAnchor {
        let href = [self.action, self.kind, self.value]
            .map(|field| utf8_percent_encode(field, FIELD_ESCAPES).to_string())
            .join(FIELD_DELIMITER);
        CondensedAnchor {
            href,
            label: self.label.to_string(),
        }
    }
}

/// An anchor whose href is `ACTION_TYPE_VALUE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CondensedAnchor {
    pub href: String,
    pub label: String,
}

impl fmt::Display for CondensedAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<a href=\"{}\">{}</a>", self.href, self.label)
    }
}

/// Split one `<a ...>...</a>` span into its fields.
///
/// Attributes are looked up inside the opening tag only. A missing marker
/// yields an empty field rather than an error, so one malformed link can't
/// blank a whole passage.
pub fn parse_anchor(span: &str) -> AnchorFields<'_> {
    let tag_end = span.find('>').unwrap_or(span.len());
    let tag = &span[..tag_end];

    let field = |marker: &str, terminators: &[u8]| {
        field_after(tag, marker, terminators).unwrap_or_else(|| {
            debug!("anchor {tag:?} has no {marker} attribute");
            ""
        })
    };

    let label = match span.get(tag_end + 1..) {
        Some(rest) => &rest[..rest.find('<').unwrap_or(rest.len())],
        None => "",
    };

    AnchorFields {
        action: field("action=", FIELD_END),
        kind: field("type=", FIELD_END),
        value: field("value=", FIELD_END),
        label,
    }
}

/// Rewrite every anchor in `escaped` into its condensed form.
///
/// Scans strictly forward: text between anchors is copied verbatim and each
/// search resumes after the last consumed `</a>`. An `<a` with no closing
/// `</a>` fails the whole call.
pub fn rewrite_links(escaped: &str) -> Result<String, MarkupError> {
    let mut out = String::with_capacity(escaped.len());
    let mut cursor = 0;

    while let Some(open) = find_anchor_open(escaped, cursor) {
        let close = find_from(escaped, ANCHOR_CLOSE, open)
            .ok_or(MarkupError::UnterminatedAnchor { offset: open })?;
        let end = close + ANCHOR_CLOSE.len();

        out.push_str(&escaped[cursor..open]);
        out.push_str(&parse_anchor(&escaped[open..end]).condense().to_string());
        cursor = end;
    }

    out.push_str(&escaped[cursor..]);
    Ok(out)
}

/// What a condensed link asks the viewer to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// Jump to a scripture reference.
    ShowRef,
    /// Look up a Strong's number in a lexicon.
    ShowStrongs,
    /// Show a morphology code.
    ShowMorph,
    /// Show a footnote or cross-reference note.
    ShowNote,
    /// Any other action keyword, kept as written.
    Other(String),
}

impl From<&str> for LinkAction {
    fn from(action: &str) -> Self {
        match action {
            "showRef" => LinkAction::ShowRef,
            "showStrongs" => LinkAction::ShowStrongs,
            "showMorph" => LinkAction::ShowMorph,
            "showNote" => LinkAction::ShowNote,
            other => LinkAction::Other(other.to_string()),
        }
    }
}

/// A condensed href split back into its three fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkTarget {
    pub action: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl LinkTarget {
    pub fn from_href(href: &str) -> Result<Self, MarkupError> {
        let malformed = || MarkupError::MalformedHref(href.to_string());

        let mut parts = href.split(FIELD_DELIMITER);
        let (Some(action), Some(kind), Some(value), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        let decode = |field: &str| {
            percent_decode_str(field)
                .decode_utf8()
                .map(|s| s.into_owned())
                .map_err(|_| malformed())
        };

        Ok(LinkTarget {
            action: decode(action)?,
            kind: decode(kind)?,
            value: decode(value)?,
        })
    }

    pub fn link_action(&self) -> LinkAction {
        LinkAction::from(self.action.as_str())
    }
}

/// A rewritten link as the display layer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayLink {
    pub target: LinkTarget,
    pub label: String,
}

/// Collect the links of already-condensed markup, in document order.
pub fn collect_links(condensed: &str) -> Result<Vec<DisplayLink>, MarkupError> {
    let mut links = Vec::new();
    let mut cursor = 0;

    while let Some(open) = find_anchor_open(condensed, cursor) {
        let close = find_from(condensed, ANCHOR_CLOSE, open)
            .ok_or(MarkupError::UnterminatedAnchor { offset: open })?;
        let span = &condensed[open..close];
        let tag_end = span.find('>').unwrap_or(span.len());
        let href = field_after(&span[..tag_end], "href=", b"\"").unwrap_or_default();

        links.push(DisplayLink {
            target: LinkTarget::from_href(href)?,
            label: span.get(tag_end + 1..).unwrap_or_default().to_string(),
        });
        cursor = close + ANCHOR_CLOSE.len();
    }

    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_with_empty_type() {
        let input = "Hello <a action=\"showRef\"&type=\"\"&value=\"Gen.1.1\">Genesis 1:1</a> world";
        assert_eq!(
            rewrite_links(input).unwrap(),
            "Hello <a href=\"showRef__Gen.1.1\">Genesis 1:1</a> world"
        );
    }

    #[test]
    fn test_field_round_trip() {
        let input = "<a action=\"showRef\"&type=\"Greek\"&value=\"G25\">Strong's</a>";
        let out = rewrite_links(input).unwrap();
        assert_eq!(out, "<a href=\"showRef_Greek_G25\">Strong's</a>");

        let links = collect_links(&out).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(
            links[0].target,
            LinkTarget {
                action: "showRef".into(),
                kind: "Greek".into(),
                value: "G25".into(),
            }
        );
        assert_eq!(links[0].label, "Strong's");
    }

    #[test]
    fn test_library_href_form() {
        let input = "<a href=\"passagestudy.jsp?action=showStrongs&type=Greek&value=25\" class=\"strongs\">25</a>";
        assert_eq!(
            rewrite_links(input).unwrap(),
            "<a href=\"showStrongs_Greek_25\">25</a>"
        );
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let input = "<a href=\"passagestudy.jsp?type=Greek&value=25&action=showStrongs\">love</a>";
        let out = rewrite_links(input).unwrap();
        assert_eq!(out, "<a href=\"showStrongs_Greek_25\">love</a>");
        assert_eq!(
            collect_links(&out).unwrap()[0].target,
            LinkTarget {
                action: "showStrongs".into(),
                kind: "Greek".into(),
                value: "25".into(),
            }
        );
    }

    #[test]
    fn test_last_key_stops_before_trailing_attributes() {
        let input = "<a href=\"x?action=showRef&value=Gen.1.1&type=scripRef\" class=\"r\">Gen</a>";
        assert_eq!(
            rewrite_links(input).unwrap(),
            "<a href=\"showRef_scripRef_Gen.1.1\">Gen</a>"
        );
    }

    #[test]
    fn test_two_anchors_with_interleaved_text() {
        let input = "a <a action=x&type=y&value=z>one</a> b\n<a action=p&type=q&value=r>two</a> c";
        assert_eq!(
            rewrite_links(input).unwrap(),
            "a <a href=\"x_y_z\">one</a> b\n<a href=\"p_q_r\">two</a> c"
        );
    }

    #[test]
    fn test_missing_attributes_degrade_to_empty_fields() {
        assert_eq!(
            rewrite_links("<a name=\"fn1\">1</a>").unwrap(),
            "<a href=\"__\">1</a>"
        );
        assert_eq!(
            rewrite_links("<a href=\"x?value=Rom.8.28\">v</a>").unwrap(),
            "<a href=\"__Rom.8.28\">v</a>"
        );
    }

    #[test]
    fn test_unterminated_anchor_is_an_error() {
        let err = rewrite_links("ok <a action=x>never closed").unwrap_err();
        assert_eq!(err, MarkupError::UnterminatedAnchor { offset: 3 });
    }

    #[test]
    fn test_second_anchor_unterminated_after_first() {
        let err = rewrite_links("<a>x</a> <a>y").unwrap_err();
        assert_eq!(err, MarkupError::UnterminatedAnchor { offset: 9 });
    }

    #[test]
    fn test_no_anchors_is_identity() {
        let s = "<p>plain <abbr>LORD</abbr> text</p>";
        assert_eq!(rewrite_links(s).unwrap(), s);
        assert_eq!(rewrite_links("").unwrap(), "");
    }

    #[test]
    fn test_label_stops_at_nested_markup() {
        let fields = parse_anchor("<a action=a&type=b&value=c><i>word</i></a>");
        assert_eq!(fields.label, "");
        let fields = parse_anchor("<a action=a&type=b&value=c>word<sup>1</sup></a>");
        assert_eq!(fields.label, "word");
    }

    #[test]
    fn test_markers_in_label_are_ignored() {
        let fields = parse_anchor("<a href=\"x\">action=nope&</a>");
        assert_eq!(fields.action, "");
        assert_eq!(fields.label, "action=nope&");
    }

    #[test]
    fn test_delimiter_inside_field_is_escaped() {
        let fields = AnchorFields {
            action: "showRef",
            kind: "scrip_Ref",
            value: "50%",
            label: "x",
        };
        let condensed = fields.condense();
        assert_eq!(condensed.href, "showRef_scrip%5FRef_50%25");

        let target = LinkTarget::from_href(&condensed.href).unwrap();
        assert_eq!(target.kind, "scrip_Ref");
        assert_eq!(target.value, "50%");
    }

    #[test]
    fn test_markup_characters_inside_field_are_escaped() {
        let fields = AnchorFields {
            action: "show Ref",
            kind: "a<b>",
            value: "q\"",
            label: "x",
        };
        let condensed = fields.condense();
        assert_eq!(condensed.href, "show%20Ref_a%3Cb%3E_q%22");
        assert_eq!(
            condensed.to_string(),
            "<a href=\"show%20Ref_a%3Cb%3E_q%22\">x</a>"
        );

        let target = LinkTarget::from_href(&condensed.href).unwrap();
        assert_eq!(target.action, "show Ref");
        assert_eq!(target.kind, "a<b>");
        assert_eq!(target.value, "q\"");
    }

    #[test]
    fn test_from_href_requires_three_fields() {
        assert!(LinkTarget::from_href("showRef_Gen.1.1").is_err());
        assert!(LinkTarget::from_href("a_b_c_d").is_err());
        assert_eq!(
            LinkTarget::from_href("showRef__Gen.1.1").unwrap().kind,
            ""
        );
    }

    #[test]
    fn test_link_action_mapping() {
        let target = LinkTarget::from_href("showStrongs_Hebrew_H430").unwrap();
        assert_eq!(target.link_action(), LinkAction::ShowStrongs);
        assert_eq!(
            LinkAction::from("showImage"),
            LinkAction::Other("showImage".into())
        );
    }

    #[test]
    fn test_collect_links_in_order() {
        let out = "<a href=\"showRef__Gen.1.1\">Gen</a> and <a href=\"showNote_x_1\">*</a>";
        let links = collect_links(out).unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].target.value, "Gen.1.1");
        assert_eq!(links[1].target.link_action(), LinkAction::ShowNote);
        assert_eq!(links[1].label, "*");
    }
}
