//! Injected JavaScript builders.
//!
//! Every lookup runs as one synchronous IIFE that tags each match with a
//! stable `data-tp-eid` attribute and returns a JSON string of match
//! metadata. Needles are embedded via `serde_json::to_string`, which yields a
//! quoted, escaped JS string literal.

use crate::driver::{InputKind, Role};

/// Shared helpers: visibility check, handle tagging, metadata extraction.
const PRELUDE: &str = r#"
  const vis = el => {
    if (!el.getClientRects().length) return false;
    const s = getComputedStyle(el);
    return s.display !== 'none' && s.visibility !== 'hidden' && s.opacity !== '0';
  };
  const mark = el => {
    if (!el.dataset.tpEid) {
      window.__tpSeq = (window.__tpSeq || 0) + 1;
      el.dataset.tpEid = 'tp-' + window.__tpSeq;
    }
    return el.dataset.tpEid;
  };
  const info = el => ({
    id: mark(el),
    tag: el.tagName.toLowerCase(),
    role: el.getAttribute('role'),
    visible: vis(el),
    text: ((el.innerText || el.value || '') + '').trim().slice(0, 120)
  });
  const accName = el =>
    ((el.innerText || el.value || el.getAttribute('aria-label') || '') + '').trim();
"#;

fn lit(s: &str) -> String {
    // Infallible for strings.
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

fn role_selector(role: Role) -> &'static str {
    match role {
        Role::Button => r#"button, input[type="submit"], input[type="button"], [role="button"]"#,
        Role::Link => r#"a[href], [role="link"]"#,
    }
}

/// Elements of `role` whose accessible name matches the needle.
pub fn role_query(role: Role, name: &str, contains: bool) -> String {
    format!(
        r#"(() => {{
{prelude}
  const needle = {needle};
  const hit = [];
  for (const el of document.querySelectorAll('{selector}')) {{
    const n = accName(el);
    const ok = {contains}
      ? n.toLowerCase().includes(needle.toLowerCase())
      : n === needle;
    if (ok) hit.push(info(el));
  }}
  return JSON.stringify(hit);
}})()"#,
        prelude = PRELUDE,
        needle = lit(name),
        selector = role_selector(role),
        contains = contains,
    )
}

/// Innermost elements whose trimmed text equals the needle exactly.
pub fn text_query(text: &str) -> String {
    format!(
        r#"(() => {{
{prelude}
  const needle = {needle};
  const all = [];
  for (const el of document.body.querySelectorAll('*')) {{
    if (['SCRIPT', 'STYLE', 'NOSCRIPT'].includes(el.tagName)) continue;
    const t = ((el.innerText || '') + '').trim();
    if (t === needle) all.push(el);
  }}
  const inner = all.filter(el => !all.some(o => o !== el && el.contains(o)));
  return JSON.stringify(inner.map(info));
}})()"#,
        prelude = PRELUDE,
        needle = lit(text),
    )
}

/// Inputs tied to a label whose text contains the needle.
pub fn label_query(label: &str) -> String {
    format!(
        r#"(() => {{
{prelude}
  const needle = {needle}.toLowerCase();
  const hit = [];
  for (const lab of document.querySelectorAll('label')) {{
    const t = ((lab.innerText || '') + '').trim().toLowerCase();
    if (!t || !t.includes(needle)) continue;
    let ctl = lab.htmlFor ? document.getElementById(lab.htmlFor) : null;
    if (!ctl) ctl = lab.querySelector('input, textarea, select');
    if (ctl) hit.push(info(ctl));
  }}
  return JSON.stringify(hit);
}})()"#,
        prelude = PRELUDE,
        needle = lit(label),
    )
}

/// Inputs whose placeholder contains the needle.
pub fn placeholder_query(placeholder: &str) -> String {
    format!(
        r#"(() => {{
{prelude}
  const needle = {needle}.toLowerCase();
  const hit = [];
  for (const el of document.querySelectorAll('input[placeholder], textarea[placeholder]')) {{
    if (el.placeholder.toLowerCase().includes(needle)) hit.push(info(el));
  }}
  return JSON.stringify(hit);
}})()"#,
        prelude = PRELUDE,
        needle = lit(placeholder),
    )
}

/// Inputs of a semantic HTML type (email, password).
pub fn input_type_query(kind: InputKind) -> String {
    format!(
        r#"(() => {{
{prelude}
  const hit = [];
  for (const el of document.querySelectorAll('input[type="{html_type}"]')) {{
    hit.push(info(el));
  }}
  return JSON.stringify(hit);
}})()"#,
        prelude = PRELUDE,
        html_type = kind.html_type(),
    )
}

/// Inputs whose name or id attribute contains the needle.
pub fn input_attr_query(needle: &str) -> String {
    format!(
        r#"(() => {{
{prelude}
  const needle = {needle}.toLowerCase();
  const hit = [];
  for (const el of document.querySelectorAll('input, textarea')) {{
    const attrs = ((el.name || '') + ' ' + (el.id || '')).toLowerCase();
    if (attrs.includes(needle)) hit.push(info(el));
  }}
  return JSON.stringify(hit);
}})()"#,
        prelude = PRELUDE,
        needle = lit(needle),
    )
}

/// Short descriptions of up to `cap` visible elements of `role`.
pub fn summaries_query(role: Role, cap: usize) -> String {
    format!(
        r#"(() => {{
{prelude}
  const out = [];
  for (const el of document.querySelectorAll('{selector}')) {{
    if (!vis(el)) continue;
    const n = accName(el).slice(0, 60);
    if (n) out.push(n);
    if (out.length >= {cap}) break;
  }}
  return JSON.stringify(out);
}})()"#,
        prelude = PRELUDE,
        selector = role_selector(role),
        cap = cap,
    )
}

/// Visibility of a previously tagged element; false when the handle is gone.
pub fn visibility_query(handle: &str) -> String {
    format!(
        r#"(() => {{
{prelude}
  const el = document.querySelector('[data-tp-eid={handle}]');
  return JSON.stringify(el ? vis(el) : false);
}})()"#,
        prelude = PRELUDE,
        handle = lit(handle),
    )
}

/// Clear a tagged input and set its value, firing input/change events.
pub fn fill_script(handle: &str, value: &str) -> String {
    format!(
        r#"(() => {{
  const el = document.querySelector('[data-tp-eid={handle}]');
  if (!el) return 'missing';
  el.focus();
  el.value = '';
  el.value = {value};
  el.dispatchEvent(new Event('input', {{ bubbles: true }}));
  el.dispatchEvent(new Event('change', {{ bubbles: true }}));
  return 'ok';
}})()"#,
        handle = lit(handle),
        value = lit(value),
    )
}
