//! Inline script applying the stored preference before first paint

use super::ThemePreference;

/// Body of the script
///
/// `__KEY__` and the preference placeholders are replaced by JSON string literals.
const INIT_SCRIPT: &str = r#"(function () {
  var key = __KEY__;
  var media = window.matchMedia("(prefers-color-scheme: dark)");
  function apply() {
    var pref = __SYSTEM__;
    try {
      pref = localStorage.getItem(key) || __SYSTEM__;
    } catch (e) {}
    var dark = pref === __DARK__ || (pref === __SYSTEM__ && media.matches);
    var root = document.documentElement;
    root.classList.toggle("dark", dark);
    root.setAttribute("data-mode", pref);
  }
  apply();
  media.addEventListener("change", apply);
  window.addEventListener("storage", function (e) {
    if (e.key === key) apply();
  });
})();
"#;

/// Script for the page `<head>` that reads `storage_key` from local storage
pub fn init_script(storage_key: &str) -> String {
    // Key goes in last so its text is never rewritten
    INIT_SCRIPT
        .replace("__SYSTEM__", &js_string(ThemePreference::System.as_str()))
        .replace("__DARK__", &js_string(ThemePreference::Dark.as_str()))
        .replace("__KEY__", &js_string(storage_key))
}

/// JSON-quoted literal that is also safe inside a `<script>` element
fn js_string(value: &str) -> String {
    // serde_json never fails on a plain string
    let quoted = serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string());
    quoted.replace("</", "<\\/")
}
