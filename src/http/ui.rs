//! Branded kiosk page shell.

use axum::response::Html;
use chrono::{Datelike, Utc};

pub async fn ui_index() -> Html<String> {
  Html(render_shell(Utc::now().year()))
}

pub fn render_shell(year: i32) -> String {
  let template = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>DILG 9 - DTR</title>
  <style>
    body { font-family: system-ui, sans-serif; margin: 0; min-height: 100vh; display: flex; flex-direction: column; }
    header { background: #fff; color: #4b5563; box-shadow: 0 2px 4px rgba(0,0,0,.1); }
    header .bar { display: flex; align-items: center; justify-content: space-between; padding: 1rem 1.5rem; }
    header h1 { font-size: 1.25rem; font-weight: 700; margin: 0; }
    main { flex: 1; display: flex; flex-direction: column; align-items: center; gap: 2rem; padding: 2rem; }
    footer { width: 100%; padding: 1rem 0; text-align: center; background: #f3f4f6; color: #4b5563; border-top: 1px solid #e5e7eb; }
  </style>
</head>
<body>
  <header>
    <div class="bar">
      <h1>DILG 9 - DTR</h1>
      <nav></nav>
    </div>
  </header>
  <main id="kiosk"></main>
  <footer>
    &copy; Copyright {YEAR} &copy; . The official website of DILG 9 DTR. Regional Information Communication and Technology Unit. All rights reserved.
  </footer>
</body>
</html>"#;
  template.replace("{YEAR}", &year.to_string())
}
