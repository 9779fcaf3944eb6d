//! Quiz submission scoring and shared results.
//!
//! # Responsibilities
//! - POST /quiz/submit: score a form submission and render the result
//! - GET /quiz/submit?quiz_id=..&result=..: render a shared result
//!
//! # Design Decisions
//! - The result is the modal answer value; ties break to the
//!   lexicographically first value so sharing links are reproducible
//! - Submissions with no answers get a friendly retake page, not an error

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{escape_html, Handler};
use crate::http::{Request, Response};

pub struct ResultHandler {
    quiz_root: PathBuf,
}

impl ResultHandler {
    pub fn new(quiz_root: &str) -> Self {
        let quiz_root = Path::new(quiz_root)
            .canonicalize()
            .unwrap_or_else(|_| PathBuf::from(quiz_root));
        tracing::info!(root = %quiz_root.display(), "result handler initialized");
        Self { quiz_root }
    }

    pub fn create(args: &HashMap<String, String>) -> Option<Box<dyn Handler>> {
        let quiz_root = args.get("quiz_root")?;
        Some(Box::new(Self::new(quiz_root)))
    }

    fn load_quiz(&self, quiz_id: &str) -> Result<Value, Response> {
        let path = self.quiz_root.join(format!("{quiz_id}.json"));
        tracing::info!(path = %path.display(), "loading quiz for result");
        let contents = fs::read_to_string(&path)
            .map_err(|_| error_response(500, "Could not read quiz file."))?;
        serde_json::from_str(&contents)
            .map_err(|_| error_response(500, "Could not read quiz file."))
    }

    fn render_result(&self, quiz_id: &str, result_key: &str) -> Response {
        let quiz = match self.load_quiz(quiz_id) {
            Ok(quiz) => quiz,
            Err(res) => return res,
        };
        let result_data = &quiz["results"][result_key];
        if result_data.is_null() {
            return error_response(404, "Result not found in quiz.");
        }
        Response::html(render_result_html(result_data, quiz_id, result_key))
    }

    fn handle_post(&self, req: &Request) -> Response {
        let body = String::from_utf8_lossy(&req.body);
        let params = parse_submission(&body);
        let quiz_id = match params.get("quiz_id") {
            Some(quiz_id) => quiz_id.clone(),
            None => {
                return error_response(
                    400,
                    "Uh oh, something went wrong! Please try submitting again.",
                )
            }
        };

        // Validate the quiz exists before scoring.
        if let Err(res) = self.load_quiz(&quiz_id) {
            return res;
        }

        let result_key = calculate_result(&params);
        if result_key == "no-result" {
            let mut body = String::new();
            body.push_str(
                "<html><head><link rel=\"stylesheet\" href=\"/static/quizzes/styles.css\">\
                 </head><body><div class='container'>",
            );
            body.push_str("<h1>Oops! You didn't answer any questions.</h1>");
            body.push_str("<p>Want to give it another shot?</p>");
            body.push_str(&format!(
                "<a href=\"/quiz/{quiz_id}\">Retake the Quiz</a><br>"
            ));
            body.push_str("<a href=\"/quiz\">Take another quiz</a>");
            body.push_str("</div></body></html>");
            return Response::html(body);
        }

        self.render_result(&quiz_id, &result_key)
    }

    fn handle_get(&self, req: &Request) -> Response {
        let query = match req.uri.split_once('?') {
            Some((_, query)) => query,
            None => return error_response(400, "Missing result parameters."),
        };
        let params = parse_submission(query);
        match (params.get("quiz_id"), params.get("result")) {
            (Some(quiz_id), Some(result_key)) => self.render_result(quiz_id, result_key),
            _ => error_response(400, "Missing result parameters."),
        }
    }
}

impl Handler for ResultHandler {
    fn handle(&self, req: &Request) -> Response {
        match req.method.as_str() {
            "POST" => self.handle_post(req),
            "GET" => self.handle_get(req),
            _ => error_response(405, "Unsupported method."),
        }
    }
}

/// Parse a form submission body (or query string) into key/value pairs.
///
/// Values wrapped in encoded quotes (`%22...%22`) have them stripped; no
/// other decoding is performed, matching how the quiz form encodes values.
pub(crate) fn parse_submission(body: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in body.split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            let value = value
                .strip_prefix("%22")
                .and_then(|v| v.strip_suffix("%22"))
                .unwrap_or(value);
            params.insert(key.to_string(), value.to_string());
        }
    }
    params
}

/// The modal answer value over fields named `q*`, first-in-sorted-order on
/// ties; "no-result" when nothing was answered.
pub(crate) fn calculate_result(params: &HashMap<String, String>) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for (key, value) in params {
        if key.starts_with('q') && key != "quiz_id" {
            *counts.entry(value.as_str()).or_default() += 1;
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, count) in &counts {
        if best.map_or(true, |(_, max)| *count > max) {
            best = Some((value, *count));
        }
    }
    best.map_or_else(|| "no-result".to_string(), |(value, _)| value.to_string())
}

fn render_result_html(result_data: &Value, quiz_id: &str, result_key: &str) -> String {
    let mut body = String::new();
    body.push_str(
        "<html><head><link rel=\"stylesheet\" href=\"/static/quizzes/styles.css\"></head>\
         <body><div class='container'>",
    );
    body.push_str(&format!(
        "<h1>{}</h1>",
        escape_html(result_data["title"].as_str().unwrap_or(result_key))
    ));
    body.push_str(&format!(
        "<p>{}</p>",
        escape_html(result_data["description"].as_str().unwrap_or(""))
    ));
    if let Some(image) = result_data["image"].as_str() {
        body.push_str("<div style='text-align: center; margin-bottom: 15px;'>");
        body.push_str(&format!(
            "<img src=\"/static/quizzes/{}\" style=\"max-width: 100%; width: 400px; \
             height: auto; border-radius: 8px; box-shadow: 0 4px 8px rgba(0,0,0,0.1);\" />",
            escape_html(image)
        ));
        body.push_str("</div>");
    }
    body.push_str("<br><a href=\"/quiz\">Take another quiz</a>");

    let share_link = format!("/quiz/submit?quiz_id={quiz_id}&result={result_key}");
    body.push_str("<div class='share-section'>");
    body.push_str("<p>Want to share your result?</p>");
    body.push_str(&format!(
        "<input type=\"text\" value=\"{share_link}\" id=\"shareLink\" readonly><br>"
    ));
    body.push_str(
        "<button onclick=\"navigator.clipboard.writeText(\
         document.getElementById('shareLink').value)\">Copy Link</button>",
    );
    body.push_str("</div></body></html>");
    body
}

fn error_response(status: u16, message: &str) -> Response {
    let reason = match status {
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        _ => "Internal Server Error",
    };
    Response::plain_text(status, reason, message)
}
