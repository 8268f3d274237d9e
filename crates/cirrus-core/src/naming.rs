//! Filename sanitization and collision resolution.

/// Reduce an uploaded filename to a safe flat name.
///
/// Path components are dropped, whitespace collapses to `_`, and anything
/// outside `[A-Za-z0-9._-]` is stripped. Leading dots are removed so a name
/// can never be hidden or empty-stemmed. Returns an empty string when
/// nothing survives; callers must treat that as a missing filename.
pub fn sanitize_filename(raw: &str) -> String {
    let last_component = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(raw);

    let mut out = String::with_capacity(last_component.len());
    for c in last_component.chars() {
        if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
            out.push(c);
        } else if c.is_whitespace() {
            out.push('_');
        }
    }

    out.trim_start_matches('.').to_string()
}

/// Pick a filename that does not collide with any name in `existing`.
///
/// Splits `desired` into `(base, extension)` and appends `_1`, `_2`, ... to
/// the base until the candidate is absent. There is no upper bound on the
/// suffix; with thousands of identically-named uploads this loop is long
/// but finite.
pub fn resolve_collision(desired: &str, existing: &[String]) -> String {
    if !existing.iter().any(|n| n == desired) {
        return desired.to_string();
    }

    let (base, extension) = split_extension(desired);
    let mut counter = 1u64;
    loop {
        let candidate = format!("{}_{}{}", base, counter, extension);
        if !existing.iter().any(|n| n == &candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Split `"report.pdf"` into `("report", ".pdf")`; a name without a dot
/// keeps an empty extension. A leading dot is part of the base.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Lower-cased extension of a filename, without the dot.
pub fn extension_of(name: &str) -> Option<String> {
    let (_, ext) = split_extension(name);
    ext.strip_prefix('.').map(|e| e.to_lowercase()).filter(|e| !e.is_empty())
}
