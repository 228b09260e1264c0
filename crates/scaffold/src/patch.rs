//! Anchor-based text splicing for the aggregator and router files.
//!
//! Every patch is idempotent: a membership check against the existing text
//! guards each insertion, so running the same patch twice changes nothing.

use regex::Regex;

/// Marker the route block is inserted in front of.
const ROUTES_CLOSING_MARKER: &str = "    </Routes>";

/// Outcome of applying one patch to a file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The text changed; the new content is carried here.
    Updated(String),
    /// The lesson was already registered; the text is unchanged.
    AlreadyPresent,
    /// The expected anchor was not found; the text is unchanged.
    AnchorMissing,
}

/// The aggregator line registering a lesson's default export.
#[must_use]
pub fn export_line(name: &str) -> String {
    format!("export {{ default as {name} }} from \"./{name}\";")
}

/// Appends the export line to the aggregator text, normalizing to a single
/// trailing newline. Returns `None` if the line is already present.
#[must_use]
pub fn append_export(text: &str, name: &str) -> Option<String> {
    let line = export_line(name);
    if text.contains(&line) {
        return None;
    }
    Some(format!("{}\n{line}\n", text.trim_end()))
}

/// Splices the lesson into the import block drawn from `"../lessons"`,
/// just before the block's closing brace.
#[must_use]
pub fn splice_import(text: &str, name: &str) -> PatchOutcome {
    let pattern = Regex::new(r#"import\s*\{[\s\S]*?\}\s*from\s*"\.\./lessons";"#)
        .expect("static pattern should compile");
    let Some(found) = pattern.find(text) else {
        return PatchOutcome::AnchorMissing;
    };

    let block = found.as_str();
    if block.contains(name) {
        return PatchOutcome::AlreadyPresent;
    }

    let Some(brace) = block.rfind('}') else {
        return PatchOutcome::AnchorMissing;
    };
    let updated_block = format!("{}  , {name}\n{}", &block[..brace], &block[brace..]);

    let mut updated = String::with_capacity(text.len() + updated_block.len());
    updated.push_str(&text[..found.start()]);
    updated.push_str(&updated_block);
    updated.push_str(&text[found.end()..]);
    PatchOutcome::Updated(updated)
}

/// The route block registering a lesson under its slug path.
#[must_use]
pub fn route_block(name: &str, route_path: &str) -> String {
    format!(
        r#"      <Route
        path="{route_path}"
        element={{
          <LessonLayout>
            <{name} />
          </LessonLayout>
        }}
      />
"#
    )
}

/// Inserts the route block immediately before the router's closing marker,
/// unless a route rendering the lesson already exists.
#[must_use]
pub fn insert_route(text: &str, name: &str, route_path: &str) -> PatchOutcome {
    if text.contains(&format!("<{name} />")) {
        return PatchOutcome::AlreadyPresent;
    }
    let Some(at) = text.find(ROUTES_CLOSING_MARKER) else {
        return PatchOutcome::AnchorMissing;
    };

    let block = route_block(name, route_path);
    let mut updated = String::with_capacity(text.len() + block.len());
    updated.push_str(&text[..at]);
    updated.push_str(&block);
    updated.push_str(&text[at..]);
    PatchOutcome::Updated(updated)
}
