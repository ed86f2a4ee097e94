//! Server-rendered HTML for the three pages.

use crate::testcase::model::{Framework, GenerationResult, Model, TestCaseRecord};
use chrono::{DateTime, NaiveDateTime};

const PRODUCT_NAME: &str = "AI-Assisted Automated Test System";

const NAV_ITEMS: [(&str, &str); 3] = [
    ("/", "Home"),
    ("/ask-test", "Ask for a Test"),
    ("/test-cases", "Test Cases"),
];

const FEATURE_CARDS: [&str; 3] = [
    "AI-assisted generation",
    "Tool-ready scripts",
    "Detailed insights",
];

const DATE_FORMAT: &str = "%d %b %Y %H:%M";

const STYLE: &str = r#"
  * { box-sizing: border-box; }
  body { margin: 0; font-family: ui-sans-serif, system-ui, -apple-system, Segoe UI, Roboto, Helvetica, Arial; background: #f8fafc; color: #0f172a; }
  header { border-bottom: 1px solid #e2e8f0; background: #ffffffcc; }
  .bar { max-width: 72rem; margin: 0 auto; padding: 16px; display: flex; align-items: center; justify-content: space-between; }
  .brand { font-weight: 600; font-size: 1.1rem; color: #0f172a; text-decoration: none; }
  nav a { border-radius: 999px; padding: 8px 16px; color: #475569; text-decoration: none; font-size: 0.9rem; }
  nav a.active { background: #6366f1; color: #fff; }
  main { max-width: 72rem; margin: 0 auto; padding: 40px 16px; }
  .eyebrow { font-size: 0.8rem; letter-spacing: 0.3em; text-transform: uppercase; color: #6366f1; }
  .muted { color: #475569; }
  .card { border: 1px solid #e2e8f0; border-radius: 16px; background: #fff; padding: 24px; margin: 16px 0; }
  .cards { display: grid; grid-template-columns: repeat(3, 1fr); gap: 16px; }
  .button { display: inline-block; border-radius: 999px; padding: 12px 24px; font-weight: 600; text-decoration: none; border: 0; cursor: pointer; background: #6366f1; color: #fff; }
  .button.secondary { background: transparent; color: #0f172a; border: 1px solid #e2e8f0; }
  label { display: flex; flex-direction: column; gap: 8px; font-size: 0.9rem; font-weight: 500; color: #334155; margin-bottom: 16px; }
  textarea, select { border: 1px solid #e2e8f0; border-radius: 12px; padding: 12px 16px; font-size: 1rem; }
  .error { border: 1px solid #fecaca; background: #fef2f2; color: #b91c1c; border-radius: 12px; padding: 12px 16px; }
  .badge { display: inline-block; border: 1px solid #e2e8f0; border-radius: 999px; padding: 4px 12px; font-size: 0.75rem; color: #475569; background: #f8fafc; }
  ol.steps { list-style: none; padding: 16px; border-radius: 16px; background: #f8fafc; }
  ol.steps li { display: flex; gap: 8px; margin: 8px 0; }
  .index { font-weight: 600; color: #6366f1; }
  pre { background: #0f172a; color: #f1f5f9; padding: 16px; border-radius: 12px; white-space: pre-wrap; overflow: auto; }
  table { width: 100%; border-collapse: collapse; font-size: 0.9rem; }
  th { text-align: left; font-size: 0.75rem; text-transform: uppercase; letter-spacing: 0.1em; color: #64748b; padding: 12px 16px; }
  td { border-top: 1px solid #f1f5f9; padding: 16px; }
  .overlay { position: fixed; inset: 0; background: #0f172a80; display: flex; align-items: center; justify-content: center; padding: 16px; }
  .dialog { width: 100%; max-width: 42rem; background: #fff; border-radius: 16px; }
  .dialog header { display: flex; justify-content: space-between; align-items: center; padding: 16px 24px; background: #fff; }
  .dialog .body { max-height: 70vh; overflow-y: auto; padding: 20px 24px; }
  dt { font-size: 0.75rem; text-transform: uppercase; color: #64748b; margin-top: 16px; }
  dd { margin: 4px 0 0 0; }
"#;

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Formats a creation timestamp; unparseable values are shown as received.
pub fn format_date(value: &str) -> String {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return date_time.format(DATE_FORMAT).to_string();
    }
    match NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(date_time) => date_time.format(DATE_FORMAT).to_string(),
        Err(_) => value.to_string(),
    }
}

pub fn layout(active_path: &str, title: &str, content: &str) -> String {
    let nav: String = NAV_ITEMS
        .iter()
        .map(|(path, label)| {
            let class = if *path == active_path { " class=\"active\"" } else { "" };
            format!("<a href=\"{path}\"{class}>{label}</a>")
        })
        .collect();
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1" />
<title>{title} | {product}</title>
<style>{style}</style>
</head>
<body>
<header><div class="bar"><a href="/" class="brand">{product}</a><nav>{nav}</nav></div></header>
<main>
{content}
</main>
</body>
</html>"#,
        title = escape_html(title),
        product = PRODUCT_NAME,
        style = STYLE,
    )
}

pub fn home_page() -> String {
    let cards: String = FEATURE_CARDS
        .iter()
        .map(|card| {
            format!(
                "<div class=\"card\"><p class=\"eyebrow\">{card}</p><p class=\"muted\">Combine automation with smart suggestions and human review with clear summaries for safer test processes.</p></div>"
            )
        })
        .collect();
    let content = format!(
        r#"<section>
<p class="eyebrow">AI-assisted automated test scenario and code generation system</p>
<h1>Generate your test scenarios and scripts in minutes with AI.</h1>
<p class="muted">Describe the requirement, pick the target test tool and receive the generated scenarios together with their automation code.</p>
<p><a class="button" href="/ask-test">Ask for a Test Scenario</a> <a class="button secondary" href="/test-cases">View Test Scenarios</a></p>
<div class="cards">{cards}</div>
</section>"#
    );
    layout("/", "Home", &content)
}

pub struct AskTestView<'a> {
    pub requirement: &'a str,
    pub framework: Framework,
    pub model: Model,
    pub error: Option<&'a str>,
    pub result: Option<&'a GenerationResult>,
}

impl Default for AskTestView<'_> {
    fn default() -> Self {
        Self {
            requirement: "",
            framework: Framework::default(),
            model: Model::default(),
            error: None,
            result: None,
        }
    }
}

pub fn ask_test_page(view: &AskTestView) -> String {
    let framework_options: String = Framework::ALL
        .iter()
        .map(|framework| {
            let selected = if *framework == view.framework { " selected" } else { "" };
            format!("<option value=\"{0}\"{1}>{0}</option>", framework.as_str(), selected)
        })
        .collect();
    let model_options: String = Model::ALL
        .iter()
        .map(|model| {
            let selected = if *model == view.model { " selected" } else { "" };
            format!(
                "<option value=\"{}\"{}>{}</option>",
                model.as_str(),
                selected,
                model.label()
            )
        })
        .collect();

    let mut content = format!(
        r#"<section>
<h1>Ask the AI to generate a test scenario</h1>
<p class="muted">Write the feature or requirement, choose the target test tool and get the generated scenarios together with their script code.</p>
<form method="post" action="/ask-test" class="card">
<label>Feature description
<textarea name="requirement" rows="6" required placeholder="Example: A user wants to reset their password through an email link...">{requirement}</textarea>
</label>
<label>Test tool
<select name="framework">{framework_options}</select>
</label>
<label>Model
<select name="model">{model_options}</select>
</label>
<button type="submit" class="button">Send Request</button>
</form>
"#,
        requirement = escape_html(view.requirement),
    );

    if let Some(error) = view.error {
        content.push_str(&format!("<div class=\"error\">{}</div>\n", escape_html(error)));
    }
    if let Some(result) = view.result {
        content.push_str(&render_result(result));
    }
    content.push_str("</section>");
    layout("/ask-test", "Ask for a Test", &content)
}

fn render_steps(steps: &[String]) -> String {
    let items: String = steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            format!(
                "<li><span class=\"index\">{}.</span><span>{}</span></li>",
                index + 1,
                escape_html(step)
            )
        })
        .collect();
    format!("<ol class=\"steps\">{items}</ol>")
}

fn render_result(result: &GenerationResult) -> String {
    let test_case = &result.test_case;
    let title = if test_case.title.is_empty() {
        "No title found".to_string()
    } else {
        escape_html(&test_case.title)
    };
    let expected = if test_case.expected.is_empty() {
        "No expected result was returned.".to_string()
    } else {
        escape_html(&test_case.expected)
    };
    let mut html = String::from("<article class=\"card result\">\n<p class=\"eyebrow\">Suggested Test Scenario</p>\n");
    html.push_str(&format!("<h2>{}</h2>\n", title));
    if !result.model_used.is_empty() {
        html.push_str(&format!("<span class=\"badge\">Model used: {}</span>\n", escape_html(&result.model_used)));
    }
    html.push_str(&format!("<h3>Steps</h3>\n{}\n", render_steps(&test_case.steps)));
    html.push_str(&format!("<h3>Expected result</h3>\n<p>{}</p>\n", expected));
    if let (Some(script), Some(body)) = (result.script.as_deref(), result.script_body()) {
        html.push_str(&format!(
            "<details><summary>Generated test script ({})</summary><pre><code>{}</code></pre></details>\n",
            escape_html(script),
            escape_html(body)
        ));
    }
    html.push_str("</article>\n");
    html
}

pub fn test_cases_page(records: Result<&[TestCaseRecord], &str>, selected: Option<i64>) -> String {
    let mut content = String::from(
        "<section>\n<h1>Test Scenarios</h1>\n<p class=\"muted\">Review every scenario the system generated together with its script code.</p>\n",
    );
    match records {
        Err(error) => {
            content.push_str(&format!("<div class=\"error\">{}</div>\n", escape_html(error)));
        }
        Ok(records) => {
            content.push_str(&render_table(records));
            if let Some(record) = selected.and_then(|id| records.iter().find(|r| r.id == id)) {
                content.push_str(&render_detail(record));
            }
        }
    }
    content.push_str("</section>");
    layout("/test-cases", "Test Cases", &content)
}

fn render_table(records: &[TestCaseRecord]) -> String {
    let mut rows = String::new();
    if records.is_empty() {
        rows.push_str("<tr><td colspan=\"6\" class=\"muted empty\">No test scenarios yet. Create new ones from the Ask for a Test page.</td></tr>");
    }
    for record in records {
        rows.push_str(&format!(
            "<tr><td><strong>#{id}</strong></td><td>{requirement}</td><td>{title}</td><td><span class=\"badge\">{framework}</span></td><td>{created}</td><td><a class=\"button secondary\" href=\"/test-cases?selected={id}\">View Details</a></td></tr>",
            id = record.id,
            requirement = escape_html(&record.requirement),
            title = escape_html(&record.title),
            framework = escape_html(&record.framework),
            created = escape_html(&format_date(&record.created_at)),
        ));
    }
    format!(
        "<div class=\"card\"><table><thead><tr><th>ID</th><th>Requirement</th><th>Title</th><th>Framework</th><th>Created</th><th aria-label=\"Actions\"></th></tr></thead><tbody>{rows}</tbody></table></div>\n"
    )
}

fn render_detail(record: &TestCaseRecord) -> String {
    let mut fields = String::new();
    fields.push_str(&format!("<dt>ID</dt><dd><strong>#{}</strong></dd>", record.id));
    for (label, value) in [
        ("Requirement", record.requirement.clone()),
        ("Title", record.title.clone()),
        ("Framework", record.framework.clone()),
        ("Created", format_date(&record.created_at)),
        ("Expected Result", record.expected.clone()),
    ] {
        fields.push_str(&format!("<dt>{}</dt><dd>{}</dd>", label, escape_html(&value)));
    }
    if !record.steps.is_empty() {
        fields.push_str(&format!("<dt>Steps</dt><dd>{}</dd>", render_steps(&record.steps)));
    }
    if !record.script_code.is_empty() {
        fields.push_str(&format!(
            "<dt>Script Code</dt><dd><pre><code>{}</code></pre></dd>",
            escape_html(&record.script_code)
        ));
    }
    format!(
        "<div class=\"overlay\" role=\"dialog\" aria-modal=\"true\"><div class=\"dialog\"><header><h3>Test Scenario Details</h3><a href=\"/test-cases\" aria-label=\"Close\">&#10005;</a></header><div class=\"body\"><dl>{fields}</dl></div></div></div>\n"
    )
}
