use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ScenarioError;

use super::types::{Entry, HttpMethod, Page, QueryParam, Scenario};

type Object = Map<String, Value>;

/// Validates a parsed archive and turns it into an ordered scenario.
///
/// Entries whose `pageref` names no declared page are dropped.
///
/// # Errors
///
/// Returns `ScenarioError::Schema` with the path of the first structural
/// violation, or `ScenarioError::Empty` when no page or entry resolves.
pub fn build_scenario(archive: &Value) -> Result<Scenario, ScenarioError> {
    let root = archive
        .as_object()
        .ok_or_else(|| ScenarioError::schema("$", "expected an object"))?;
    let log = require_object(root, "log", "log")?;
    let raw_pages = require_array(log, "pages", "log.pages")?;
    let raw_entries = require_array(log, "entries", "log.entries")?;

    let mut pages = Vec::with_capacity(raw_pages.len());
    for (idx, raw_page) in raw_pages.iter().enumerate() {
        pages.push(parse_page(raw_page, &format!("log.pages[{}]", idx))?);
    }

    let mut entries = Vec::with_capacity(raw_entries.len());
    for (idx, raw_entry) in raw_entries.iter().enumerate() {
        entries.push(parse_entry(raw_entry, &format!("log.entries[{}]", idx))?);
    }

    let dropped = entries
        .iter()
        .filter(|(pageref, _)| !pages.iter().any(|page| &page.id == pageref))
        .count();
    if dropped > 0 {
        debug!("Dropped {} entr(y/ies) with an unknown pageref", dropped);
    }

    for page in &mut pages {
        page.entries = entries
            .iter()
            .filter(|(pageref, _)| pageref == &page.id)
            .map(|(_, entry)| entry.clone())
            .collect();
    }

    let scenario = Scenario::new(pages);
    if scenario.pages().is_empty() || scenario.entry_count() == 0 {
        return Err(ScenarioError::Empty);
    }
    Ok(scenario)
}

/// Collapses an ordered header list into a map; later names overwrite earlier ones.
pub(crate) fn normalize_headers<I>(headers: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut normalized = BTreeMap::new();
    for (name, value) in headers {
        normalized.insert(name, value);
    }
    normalized
}

fn parse_page(value: &Value, path: &str) -> Result<Page, ScenarioError> {
    let page = value
        .as_object()
        .ok_or_else(|| ScenarioError::schema(path, "expected an object"))?;
    let id = require_non_empty_str(page, "id", &format!("{}.id", path))?;
    let title = require_str(page, "title", &format!("{}.title", path))?;
    Ok(Page {
        id: id.to_owned(),
        title: title.to_owned(),
        entries: Vec::new(),
    })
}

fn parse_entry(value: &Value, path: &str) -> Result<(String, Entry), ScenarioError> {
    let entry = value
        .as_object()
        .ok_or_else(|| ScenarioError::schema(path, "expected an object"))?;
    let pageref = require_str(entry, "pageref", &format!("{}.pageref", path))?;
    let request_path = format!("{}.request", path);
    let request = require_object(entry, "request", &request_path)?;

    let method_path = format!("{}.method", request_path);
    let raw_method = require_str(request, "method", &method_path)?;
    let method = HttpMethod::from_archive(raw_method).ok_or_else(|| {
        let allowed: Vec<&str> = HttpMethod::ALL.iter().map(|method| method.as_str()).collect();
        ScenarioError::schema(
            &method_path,
            format!("'{}' is not one of {}", raw_method, allowed.join(", ")),
        )
    })?;
    let url = require_non_empty_str(request, "url", &format!("{}.url", request_path))?;

    let headers = parse_pairs(request, "headers", &request_path)?;
    let query_string = parse_pairs(request, "queryString", &request_path)?
        .into_iter()
        .map(|(name, value)| QueryParam { name, value })
        .collect();
    let body = request
        .get("postData")
        .and_then(Value::as_object)
        .and_then(|post| post.get("text"))
        .and_then(Value::as_str)
        .map(str::to_owned);

    Ok((
        pageref.to_owned(),
        Entry {
            method,
            url: url.to_owned(),
            headers: normalize_headers(headers),
            query_string,
            body,
        },
    ))
}

fn parse_pairs(
    request: &Object,
    key: &str,
    request_path: &str,
) -> Result<Vec<(String, String)>, ScenarioError> {
    let Some(value) = request.get(key) else {
        return Ok(Vec::new());
    };
    let path = format!("{}.{}", request_path, key);
    let items = value
        .as_array()
        .ok_or_else(|| ScenarioError::schema(&path, "expected an array"))?;
    let mut pairs = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let item_path = format!("{}[{}]", path, idx);
        let pair = item
            .as_object()
            .ok_or_else(|| ScenarioError::schema(&item_path, "expected an object"))?;
        let name = require_non_empty_str(pair, "name", &format!("{}.name", item_path))?;
        let value = require_str(pair, "value", &format!("{}.value", item_path))?;
        pairs.push((name.to_owned(), value.to_owned()));
    }
    Ok(pairs)
}

fn require_object<'archive>(
    parent: &'archive Object,
    key: &str,
    path: &str,
) -> Result<&'archive Object, ScenarioError> {
    let Some(value) = parent.get(key) else {
        return Err(ScenarioError::schema(path, "is required"));
    };
    value
        .as_object()
        .ok_or_else(|| ScenarioError::schema(path, "expected an object"))
}

fn require_array<'archive>(
    parent: &'archive Object,
    key: &str,
    path: &str,
) -> Result<&'archive Vec<Value>, ScenarioError> {
    let Some(value) = parent.get(key) else {
        return Err(ScenarioError::schema(path, "is required"));
    };
    value
        .as_array()
        .ok_or_else(|| ScenarioError::schema(path, "expected an array"))
}

fn require_str<'archive>(
    parent: &'archive Object,
    key: &str,
    path: &str,
) -> Result<&'archive str, ScenarioError> {
    let Some(value) = parent.get(key) else {
        return Err(ScenarioError::schema(path, "is required"));
    };
    value
        .as_str()
        .ok_or_else(|| ScenarioError::schema(path, "expected a string"))
}

fn require_non_empty_str<'archive>(
    parent: &'archive Object,
    key: &str,
    path: &str,
) -> Result<&'archive str, ScenarioError> {
    let value = require_str(parent, key, path)?;
    if value.is_empty() {
        return Err(ScenarioError::schema(path, "must not be empty"));
    }
    Ok(value)
}
