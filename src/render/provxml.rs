//! PROV-XML rendering.
//!
//! One element per record nested under a namespaced root. Plain fields become
//! child elements with text content; foreign-key references (relation
//! endpoints, description links) become empty child elements carrying a
//! `ref` attribute instead. Under the W3C profile, records that represent a
//! node's linked description are lifted out of the entity bucket and inlined
//! beneath the referencing node, as nested children of its description
//! element; under VOProv they stay top-level and the link stays a reference.

use std::collections::HashMap;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::RenderError;
use crate::serialize::{FieldMap, Profile, SerializedDocument};

/// Local field names that reference another record by id.
const REF_FIELDS: &[&str] = &[
    "activity",
    "entity",
    "agent",
    "collection",
    "generatedEntity",
    "usedEntity",
    "informed",
    "informant",
    "influencee",
    "influencer",
    "activityFlow",
    "description",
];

fn ns(profile: Profile) -> &'static str {
    match profile {
        Profile::VoProv => "voprov",
        Profile::W3c => "prov",
    }
}

fn local_name(key: &str) -> &str {
    key.split_once(':').map_or(key, |(_, local)| local)
}

fn is_ref_field(key: &str) -> bool {
    REF_FIELDS.contains(&local_name(key))
}

type XmlResult = Result<(), RenderError>;

fn io_err<E>(err: E) -> RenderError
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    RenderError::Xml { source: std::io::Error::other(err) }
}

fn write_field<W: std::io::Write>(
    writer: &mut Writer<W>,
    profile: Profile,
    key: &str,
    value: &str,
) -> XmlResult {
    if is_ref_field(key) {
        let mut element = BytesStart::new(key);
        element.push_attribute((format!("{}:ref", ns(profile)).as_str(), value));
        writer.write_event(Event::Empty(element)).map_err(io_err)?;
    } else {
        writer.write_event(Event::Start(BytesStart::new(key))).map_err(io_err)?;
        writer.write_event(Event::Text(BytesText::new(value))).map_err(io_err)?;
        writer.write_event(Event::End(BytesEnd::new(key))).map_err(io_err)?;
    }
    Ok(())
}

/// Write one record element; `inline` maps description ids to the records to
/// nest beneath the referencing description element (W3C only, empty otherwise).
fn write_record<W: std::io::Write>(
    writer: &mut Writer<W>,
    profile: Profile,
    element_name: &str,
    key: &str,
    fields: &FieldMap,
    inline: &HashMap<String, FieldMap>,
) -> XmlResult {
    let mut fields = fields.clone();
    let id_key = format!("{}:id", ns(profile));
    // Node records carry their id as a field; bare relation ids fall back to
    // the (blank-qualified) bucket key.
    let id = fields.shift_remove(&id_key).unwrap_or_else(|| key.to_string());

    let mut element = BytesStart::new(element_name);
    element.push_attribute((id_key.as_str(), id.as_str()));
    writer.write_event(Event::Start(element)).map_err(io_err)?;

    for (field_key, value) in &fields {
        if local_name(field_key) == "description" {
            if let Some(description) = inline.get(value) {
                // Inline the linked description as nested children.
                writer
                    .write_event(Event::Start(BytesStart::new(field_key.as_str())))
                    .map_err(io_err)?;
                let mut description = description.clone();
                if let Some(desc_id) = description.shift_remove(&id_key) {
                    writer
                        .write_event(Event::Start(BytesStart::new(id_key.as_str())))
                        .map_err(io_err)?;
                    writer
                        .write_event(Event::Text(BytesText::new(&desc_id)))
                        .map_err(io_err)?;
                    writer
                        .write_event(Event::End(BytesEnd::new(id_key.as_str())))
                        .map_err(io_err)?;
                }
                for (k, v) in &description {
                    write_field(writer, profile, k, v)?;
                }
                writer
                    .write_event(Event::End(BytesEnd::new(field_key.as_str())))
                    .map_err(io_err)?;
                continue;
            }
        }
        write_field(writer, profile, field_key, value)?;
    }

    writer.write_event(Event::End(BytesEnd::new(element_name))).map_err(io_err)?;
    Ok(())
}

/// Render the document as PROV-XML.
pub fn render(doc: &SerializedDocument) -> Result<String, RenderError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(io_err)?;

    let root_name = format!("{}:document", ns(doc.profile));
    let mut root = BytesStart::new(root_name.as_str());
    for (name, uri) in &doc.prefix {
        root.push_attribute((format!("xmlns:{name}").as_str(), uri.as_str()));
    }
    writer.write_event(Event::Start(root)).map_err(io_err)?;

    // Under W3C, linked description records are inlined beneath the nodes
    // referencing them instead of being emitted top-level.
    let mut inline: HashMap<String, FieldMap> = HashMap::new();
    if doc.profile == Profile::W3c {
        if let Some(entities) = doc.bucket("entity") {
            for (id, fields) in entities {
                if matches!(
                    fields.get("voprov:votype").map(String::as_str),
                    Some("voprov:activityDescription") | Some("voprov:entityDescription")
                ) {
                    inline.insert(id.clone(), fields.clone());
                }
            }
        }
    }

    for (bucket_name, bucket) in &doc.buckets {
        let element_name = format!("{}:{bucket_name}", ns(doc.profile));
        for (key, fields) in bucket {
            if inline.contains_key(key) {
                continue;
            }
            write_record(&mut writer, doc.profile, &element_name, key, fields, &inline)?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new(root_name.as_str()))).map_err(io_err)?;

    String::from_utf8(writer.into_inner())
        .map_err(|e| RenderError::Xml { source: std::io::Error::other(e) })
}
