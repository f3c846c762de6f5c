//! PROV-N text rendering.
//!
//! One line per record, built from a fixed positional-argument template per
//! record kind. Positional values are popped from the field mapping (checking
//! both the `prov:` and `voprov:` spelling of the key) and render as `-` when
//! absent; whatever remains becomes the bracketed optional-attribute list, in
//! mapping order. The whole document is framed by `document`/`endDocument`
//! with one `prefix` line per namespace.

use crate::serialize::{FieldMap, SerializedDocument};

/// Positional template of one record kind.
struct Template {
    keyword: &'static str,
    /// Local names of the positional arguments (`id` pops the id field).
    positions: &'static [&'static str],
    /// Whether a qualified relation id renders as a leading `id; `.
    relation_id: bool,
    /// Whether leftover fields render as a bracketed attribute list.
    attributes: bool,
}

const TEMPLATES: &[(&str, Template)] = &[
    ("activity", Template {
        keyword: "activity",
        positions: &["id", "startTime", "endTime"],
        relation_id: false,
        attributes: true,
    }),
    ("activityFlow", Template {
        keyword: "activityFlow",
        positions: &["id", "startTime", "endTime"],
        relation_id: false,
        attributes: true,
    }),
    ("activityDescription", Template {
        keyword: "activityDescription",
        positions: &["id", "name"],
        relation_id: false,
        attributes: true,
    }),
    ("entity", Template {
        keyword: "entity",
        positions: &["id"],
        relation_id: false,
        attributes: true,
    }),
    ("collection", Template {
        keyword: "collection",
        positions: &["id"],
        relation_id: false,
        attributes: true,
    }),
    ("entityDescription", Template {
        keyword: "entityDescription",
        positions: &["id", "name"],
        relation_id: false,
        attributes: true,
    }),
    ("agent", Template {
        keyword: "agent",
        positions: &["id"],
        relation_id: false,
        attributes: true,
    }),
    ("parameter", Template {
        keyword: "parameter",
        positions: &["id", "activity", "value"],
        relation_id: false,
        attributes: true,
    }),
    ("parameterDescription", Template {
        keyword: "parameterDescription",
        positions: &["id", "name"],
        relation_id: false,
        attributes: true,
    }),
    ("used", Template {
        keyword: "used",
        positions: &["activity", "entity", "time"],
        relation_id: true,
        attributes: true,
    }),
    ("wasGeneratedBy", Template {
        keyword: "wasGeneratedBy",
        positions: &["entity", "activity", "time"],
        relation_id: true,
        attributes: true,
    }),
    ("wasAssociatedWith", Template {
        keyword: "wasAssociatedWith",
        positions: &["activity", "agent", "plan"],
        relation_id: true,
        attributes: true,
    }),
    ("wasAttributedTo", Template {
        keyword: "wasAttributedTo",
        positions: &["entity", "agent"],
        relation_id: true,
        attributes: true,
    }),
    // hadMember carries neither an id nor attributes in PROV-N.
    ("hadMember", Template {
        keyword: "hadMember",
        positions: &["collection", "entity"],
        relation_id: false,
        attributes: false,
    }),
    ("wasDerivedFrom", Template {
        keyword: "wasDerivedFrom",
        positions: &["generatedEntity", "usedEntity", "activity", "generation", "usage"],
        relation_id: true,
        attributes: true,
    }),
    ("hadStep", Template {
        keyword: "hadStep",
        positions: &["activityFlow", "activity"],
        relation_id: true,
        attributes: true,
    }),
    ("wasInformedBy", Template {
        keyword: "wasInformedBy",
        positions: &["informed", "informant"],
        relation_id: true,
        attributes: true,
    }),
    ("wasInfluencedBy", Template {
        keyword: "wasInfluencedBy",
        positions: &["influencee", "influencer"],
        relation_id: true,
        attributes: true,
    }),
];

/// Pop a positional value, trying the `prov:` and `voprov:` spellings.
fn take_value(fields: &mut FieldMap, key: &str) -> String {
    for namespace in ["prov", "voprov"] {
        if let Some(value) = fields.shift_remove(&format!("{namespace}:{key}")) {
            return value;
        }
    }
    "-".to_string()
}

fn render_record(template: &Template, fields: &FieldMap) -> String {
    let mut fields = fields.clone();
    let mut line = String::from(template.keyword);
    line.push('(');

    if template.relation_id {
        // The id field is present only when the relation id was qualified;
        // a bare internal id is skipped in PROV-N.
        let id = take_value(&mut fields, "id");
        if id != "-" {
            line.push_str(&id);
            line.push_str("; ");
        }
    }

    let positions: Vec<String> =
        template.positions.iter().map(|p| take_value(&mut fields, p)).collect();
    line.push_str(&positions.join(", "));

    if template.attributes && !fields.is_empty() {
        let attributes: Vec<String> =
            fields.iter().map(|(k, v)| format!("{k}=\"{v}\"")).collect();
        line.push_str(", [");
        line.push_str(&attributes.join(", "));
        line.push(']');
    }
    line.push(')');
    line
}

/// Render the whole document as PROV-N text.
pub fn render(doc: &SerializedDocument) -> String {
    let mut out = String::from("document\n");
    for (name, uri) in &doc.prefix {
        out.push_str(&format!("prefix {name} <{uri}>\n"));
    }
    out.push('\n');

    for (bucket_name, template) in TEMPLATES {
        let Some(bucket) = doc.bucket(bucket_name) else { continue };
        for fields in bucket.values() {
            out.push_str(&render_record(template, fields));
            out.push('\n');
        }
    }

    out.push_str("endDocument");
    out
}
