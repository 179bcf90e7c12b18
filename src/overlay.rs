// Template overlay: composite a values-only PDF onto the official form.
//
// Each overlay page becomes a Form XObject that is drawn after the template
// page's own content, which is wrapped in q/Q so no graphics state leaks into
// the overlay.

use log::{debug, warn};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::io::Read;

use crate::error::RenderError;
use crate::layout::{PAGE_COUNT, PAGE_HEIGHT, PAGE_WIDTH};
use crate::pdf::save_document;

/// Resource name the overlay XObject is registered under on each page.
const OVERLAY_NAME: &str = "CcewOverlay";

/// Parent chain depth limit when resolving inherited resources.
const MAX_TREE_DEPTH: usize = 32;

// ============================================================================
// Template loading
// ============================================================================

/// Read the template from a filesystem path or an http(s) URL.
pub fn load_template(location: &str) -> Result<Vec<u8>, RenderError> {
    let bytes = if location.starts_with("http://") || location.starts_with("https://") {
        let response = ureq::get(location)
            .call()
            .map_err(|e| RenderError::Template(format!("Failed to fetch URL: {}", e)))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| RenderError::Template(format!("Failed to read response: {}", e)))?;
        bytes
    } else {
        std::fs::read(location).map_err(|e| RenderError::Template(format!("{}: {}", location, e)))?
    };

    if bytes.is_empty() {
        return Err(RenderError::Template(format!("{}: template is empty", location)));
    }
    debug!("Loaded template from {} ({} bytes)", location, bytes.len());
    Ok(bytes)
}

// ============================================================================
// Compositing
// ============================================================================

/// Stamp each overlay page onto the matching template page.
///
/// The template must have at least as many pages as the form; extra pages are
/// dropped so the output always has exactly the form's page count.
pub fn composite(template_bytes: &[u8], overlay_bytes: &[u8]) -> Result<Vec<u8>, RenderError> {
    let mut template = Document::load_mem(template_bytes)
        .map_err(|e| RenderError::Template(format!("Failed to parse template: {}", e)))?;
    let mut overlay =
        Document::load_mem(overlay_bytes).map_err(|e| RenderError::Pdf(e.to_string()))?;

    let page_count = template.get_pages().len();
    if page_count < PAGE_COUNT {
        return Err(RenderError::Template(format!(
            "template has {} page(s), the form needs {}",
            page_count, PAGE_COUNT
        )));
    }
    if page_count > PAGE_COUNT {
        warn!(
            "Template has {} pages; dropping pages {}..={}",
            page_count,
            PAGE_COUNT + 1,
            page_count
        );
        let extra: Vec<u32> = ((PAGE_COUNT as u32 + 1)..=(page_count as u32)).collect();
        template.delete_pages(&extra);
    }

    overlay.renumber_objects_with(template.max_id + 1);

    let mut forms = Vec::with_capacity(PAGE_COUNT);
    for (number, page_id) in overlay.get_pages() {
        let content = overlay
            .get_page_content(page_id)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let resources = inherited_resources(&overlay, page_id)?;
        forms.push((number, form_xobject(content, resources)));
    }

    // printpdf marks page content as optional; the groups must be declared
    // in the catalog the content ends up in
    let groups = optional_content_groups(&overlay);
    template.objects.extend(overlay.objects);
    template.max_id = template.objects.keys().map(|id| id.0).max().unwrap_or(template.max_id);

    let template_pages = template.get_pages();
    for (number, form) in forms {
        let Some(&page_id) = template_pages.get(&number) else {
            continue;
        };
        let form_id = template.add_object(form);
        attach_overlay(&mut template, page_id, form_id)?;
    }
    register_optional_content(&mut template, &groups)?;

    template.prune_objects();
    save_document(&mut template)
}

fn form_xobject(content: Vec<u8>, resources: Dictionary) -> Stream {
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => vec![
                0.into(),
                0.into(),
                (PAGE_WIDTH as i64).into(),
                (PAGE_HEIGHT as i64).into(),
            ],
            "Resources" => resources,
        },
        content,
    )
}

/// Register the form on the page and draw it after the existing content.
fn attach_overlay(
    document: &mut Document,
    page_id: ObjectId,
    form_id: ObjectId,
) -> Result<(), RenderError> {
    let mut resources = inherited_resources(document, page_id)?;
    let mut xobjects = match resources.get(b"XObject") {
        Ok(Object::Dictionary(dict)) => dict.clone(),
        Ok(Object::Reference(id)) => document
            .get_dictionary(*id)
            .map(Dictionary::clone)
            .unwrap_or_default(),
        _ => Dictionary::new(),
    };
    xobjects.set(OVERLAY_NAME, Object::Reference(form_id));
    resources.set("XObject", xobjects);

    let existing = match document.get_dictionary(page_id).and_then(|page| page.get(b"Contents")) {
        Ok(Object::Array(items)) => items.clone(),
        Ok(Object::Reference(id)) => match document.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        _ => Vec::new(),
    };

    let open_id = document.add_object(Stream::new(dictionary! {}, b"q\n".to_vec()));
    let close_id = document.add_object(Stream::new(
        dictionary! {},
        format!("Q\nq /{} Do Q\n", OVERLAY_NAME).into_bytes(),
    ));

    let mut contents = Vec::with_capacity(existing.len() + 2);
    contents.push(Object::Reference(open_id));
    contents.extend(existing);
    contents.push(Object::Reference(close_id));

    let page = document
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| RenderError::Template(format!("Malformed template page: {}", e)))?;
    page.set("Resources", resources);
    page.set("Contents", contents);
    Ok(())
}

// ============================================================================
// Optional content
// ============================================================================

/// Ids of every optional content group object in the document.
fn optional_content_groups(document: &Document) -> Vec<ObjectId> {
    document
        .objects
        .iter()
        .filter(|(_, object)| {
            object
                .as_dict()
                .and_then(|dict| dict.get(b"Type"))
                .and_then(Object::as_name)
                .map_or(false, |name| name == b"OCG")
        })
        .map(|(&id, _)| id)
        .collect()
}

/// List `groups` in the catalog's `/OCProperties`, visible by default.
/// Creates the dictionary when the template has none.
fn register_optional_content(
    document: &mut Document,
    groups: &[ObjectId],
) -> Result<(), RenderError> {
    if groups.is_empty() {
        return Ok(());
    }
    let root_id = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|e| RenderError::Template(format!("Template has no catalog: {}", e)))?;
    let catalog = document
        .get_dictionary(root_id)
        .map_err(|e| RenderError::Template(format!("Malformed catalog: {}", e)))?;

    let mut properties = resolved_dictionary(document, catalog.get(b"OCProperties").ok());
    let mut declared = resolved_array(document, properties.get(b"OCGs").ok());
    let mut defaults = resolved_dictionary(document, properties.get(b"D").ok());
    let mut visible = resolved_array(document, defaults.get(b"ON").ok());

    for &group in groups {
        for list in [&mut declared, &mut visible] {
            if !list.iter().any(|item| item.as_reference().ok() == Some(group)) {
                list.push(Object::Reference(group));
            }
        }
    }
    debug!("Declared {} overlay optional content group(s)", groups.len());

    defaults.set("ON", visible);
    properties.set("OCGs", declared);
    properties.set("D", defaults);
    document
        .get_object_mut(root_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| RenderError::Template(format!("Malformed catalog: {}", e)))?
        .set("OCProperties", properties);
    Ok(())
}

fn resolve<'a>(document: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => document.get_object(*id).unwrap_or(object),
        other => other,
    }
}

fn resolved_dictionary(document: &Document, object: Option<&Object>) -> Dictionary {
    match object.map(|object| resolve(document, object)) {
        Some(Object::Dictionary(dict)) => dict.clone(),
        _ => Dictionary::new(),
    }
}

fn resolved_array(document: &Document, object: Option<&Object>) -> Vec<Object> {
    match object.map(|object| resolve(document, object)) {
        Some(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

/// The page's resource dictionary, following `Parent` links when the page
/// inherits it. Always a detached copy.
fn inherited_resources(document: &Document, page_id: ObjectId) -> Result<Dictionary, RenderError> {
    let mut node = page_id;
    for _ in 0..MAX_TREE_DEPTH {
        let dict = document
            .get_dictionary(node)
            .map_err(|e| RenderError::Template(format!("Malformed page tree: {}", e)))?;
        match dict.get(b"Resources") {
            Ok(Object::Dictionary(resources)) => return Ok(resources.clone()),
            Ok(Object::Reference(id)) => {
                return document
                    .get_dictionary(*id)
                    .map(Dictionary::clone)
                    .map_err(|e| RenderError::Template(format!("Malformed resources: {}", e)));
            }
            _ => {}
        }
        match dict.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent) => node = parent,
            Err(_) => return Ok(Dictionary::new()),
        }
    }
    Err(RenderError::Template("page tree is too deep".to_string()))
}
