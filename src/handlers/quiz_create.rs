//! Quiz authoring form.
//!
//! # Responsibilities
//! - GET /quiz/create: render the authoring form
//! - POST /quiz/create: validate the submission and persist the quiz JSON
//!
//! # Design Decisions
//! - Form values are percent-decoded here ('+' first, then `%xx`); the rest
//!   of the quiz pipeline reads the stored JSON only
//! - Quiz IDs are restricted to `[a-zA-Z0-9._-]` so the ID is safe to use
//!   as a file name
//! - Quizzes always carry exactly four results

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use super::{escape_html, Handler};
use crate::http::{Request, Response};

const RESULT_COUNT: usize = 4;

pub struct CreateQuizHandler {
    quiz_root: PathBuf,
}

impl CreateQuizHandler {
    pub fn new(quiz_root: &str) -> Self {
        let quiz_root = Path::new(quiz_root)
            .canonicalize()
            .unwrap_or_else(|_| PathBuf::from(quiz_root));
        tracing::info!(root = %quiz_root.display(), "create-quiz handler initialized");
        Self { quiz_root }
    }

    pub fn create(args: &HashMap<String, String>) -> Option<Box<dyn Handler>> {
        let quiz_root = args.get("quiz_root")?;
        if let Err(error) = fs::create_dir_all(quiz_root) {
            tracing::warn!(%quiz_root, %error, "failed to open quiz root");
            return None;
        }
        Some(Box::new(Self::new(quiz_root)))
    }

    fn handle_post(&self, req: &Request) -> Response {
        let body = String::from_utf8_lossy(&req.body);
        let params = match decode_form(&body) {
            Ok(params) => params,
            Err(field) => {
                return error_response(
                    400,
                    &format!("Submission contains invalid characters in field: {field}"),
                )
            }
        };

        let quiz_id = match params.get("quiz_id") {
            Some(id) if is_valid_quiz_id(id) => id.clone(),
            Some(_) => {
                return error_response(
                    400,
                    "Quiz ID may only contain letters, numbers, '.', '_' and '-'.",
                )
            }
            None => return error_response(400, "Missing quiz ID."),
        };
        let title = match params.get("title") {
            Some(title) if !title.trim().is_empty() => title.clone(),
            _ => return error_response(400, "Missing quiz title."),
        };

        let quiz = match build_quiz(&title, &params) {
            Ok(quiz) => quiz,
            Err(message) => return error_response(400, &message),
        };

        let pretty = serde_json::to_string_pretty(&quiz)
            .unwrap_or_else(|_| quiz.to_string());
        let path = self.quiz_root.join(format!("{quiz_id}.json"));
        if let Err(error) = fs::write(&path, &pretty) {
            tracing::error!(path = %path.display(), %error, "failed to write quiz file");
            return error_response(500, "Failed to save quiz.");
        }

        tracing::info!(%quiz_id, "quiz created");
        let mut body = String::new();
        body.push_str(
            "<html><head><link rel=\"stylesheet\" href=\"/static/quizzes/styles.css\"></head>\
             <body><div class='container'>",
        );
        body.push_str("<h1>Quiz created!</h1>");
        body.push_str(&format!(
            "<p><a href=\"/quiz/{quiz_id}\">Take {}</a></p>",
            escape_html(&title)
        ));
        body.push_str("<a href=\"/quiz\">Back to all quizzes</a>");
        body.push_str("</div></body></html>");
        Response::html(body)
    }
}

impl Handler for CreateQuizHandler {
    fn handle(&self, req: &Request) -> Response {
        if req.uri != "/quiz/create" {
            return error_response(404, "Page not found.");
        }
        match req.method.as_str() {
            "GET" => Response::html(render_form()),
            "POST" => self.handle_post(req),
            _ => error_response(405, "Unsupported method."),
        }
    }
}

/// Decode an `application/x-www-form-urlencoded` body. Returns the offending
/// field name when a value fails to percent-decode.
fn decode_form(body: &str) -> Result<HashMap<String, String>, String> {
    let mut params = HashMap::new();
    for pair in body.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = key.to_string();
        let spaced = value.replace('+', " ");
        let decoded = urlencoding::decode(&spaced).map_err(|_| key.clone())?;
        params.insert(key, decoded.into_owned());
    }
    Ok(params)
}

fn is_valid_quiz_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Assemble the quiz JSON from the numbered form fields, validating that
/// every option's result value has a matching result definition.
fn build_quiz(title: &str, params: &HashMap<String, String>) -> Result<Value, String> {
    let mut results = serde_json::Map::new();
    let mut result_keys = Vec::new();
    for n in 0..RESULT_COUNT {
        let key = params
            .get(&format!("result_{n}_key"))
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| format!("Missing result {} key.", n + 1))?;
        let result_title = params
            .get(&format!("result_{n}_title"))
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| format!("Missing result {} title.", n + 1))?;
        let desc = params
            .get(&format!("result_{n}_desc"))
            .cloned()
            .unwrap_or_default();
        results.insert(
            key.clone(),
            json!({"title": result_title, "description": desc}),
        );
        result_keys.push(key.clone());
    }

    let mut questions = Vec::new();
    let mut q_num = 0;
    while let Some(prompt) = params.get(&format!("q{q_num}_prompt")) {
        if prompt.trim().is_empty() {
            return Err(format!("Question {} has no prompt.", q_num + 1));
        }
        let mut options = Vec::new();
        let mut opt_num = 0;
        while let Some(text) = params.get(&format!("q{q_num}_opt{opt_num}_text")) {
            let value = params
                .get(&format!("q{q_num}_opt{opt_num}_val"))
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| {
                    format!("Question {} option {} has no result value.", q_num + 1, opt_num + 1)
                })?;
            if !result_keys.iter().any(|key| key == value) {
                return Err(format!(
                    "Question {} option {} points at undefined result '{value}'.",
                    q_num + 1,
                    opt_num + 1
                ));
            }
            options.push(json!({"text": text, "value": value}));
            opt_num += 1;
        }
        if options.is_empty() {
            return Err(format!("Question {} has no options.", q_num + 1));
        }
        questions.push(json!({"prompt": prompt, "options": options}));
        q_num += 1;
    }
    if questions.is_empty() {
        return Err("Quiz has no questions.".to_string());
    }

    Ok(json!({
        "title": title,
        "questions": questions,
        "results": Value::Object(results),
    }))
}

fn render_form() -> String {
    let mut body = String::new();
    body.push_str(
        "<html><head><title>Create a Quiz</title>\
         <link rel=\"stylesheet\" href=\"/static/quizzes/styles.css\"></head>\
         <body><div class='container'>",
    );
    body.push_str("<h1>Create a Quiz</h1>");
    body.push_str("<form action=\"/quiz/create\" method=\"POST\">");
    body.push_str(
        "<label>Quiz ID (letters, numbers, '.', '_', '-'): \
         <input type=\"text\" name=\"quiz_id\" required></label><br>",
    );
    body.push_str("<label>Title: <input type=\"text\" name=\"title\" required></label><br>");

    body.push_str("<h2>Results</h2>");
    for n in 0..RESULT_COUNT {
        body.push_str(&format!("<fieldset><legend>Result {}</legend>", n + 1));
        body.push_str(&format!(
            "<label>Key: <input type=\"text\" name=\"result_{n}_key\" required></label><br>"
        ));
        body.push_str(&format!(
            "<label>Title: <input type=\"text\" name=\"result_{n}_title\" required></label><br>"
        ));
        body.push_str(&format!(
            "<label>Description: <input type=\"text\" name=\"result_{n}_desc\"></label>"
        ));
        body.push_str("</fieldset>");
    }

    body.push_str("<h2>Questions</h2>");
    for q_num in 0..3 {
        body.push_str(&format!("<fieldset><legend>Question {}</legend>", q_num + 1));
        body.push_str(&format!(
            "<label>Prompt: <input type=\"text\" name=\"q{q_num}_prompt\"></label><br>"
        ));
        for opt_num in 0..RESULT_COUNT {
            body.push_str(&format!(
                "<label>Option {} text: \
                 <input type=\"text\" name=\"q{q_num}_opt{opt_num}_text\"></label>",
                opt_num + 1
            ));
            body.push_str(&format!(
                "<label>result key: \
                 <input type=\"text\" name=\"q{q_num}_opt{opt_num}_val\"></label><br>"
            ));
        }
        body.push_str("</fieldset>");
    }

    body.push_str("<input type=\"submit\" value=\"Create Quiz\">");
    body.push_str("</form></div></body></html>");
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::parse_request;

    fn handler() -> (tempfile::TempDir, CreateQuizHandler) {
        let dir = tempfile::tempdir().unwrap();
        let handler = CreateQuizHandler::new(dir.path().to_str().unwrap());
        (dir, handler)
    }

    fn post(body: &str) -> Request {
        parse_request(format!("POST /quiz/create HTTP/1.1\r\n\r\n{body}").as_bytes())
    }

    fn valid_submission() -> String {
        let mut body = String::from("quiz_id=dining&title=Which+dining+hall%3F");
        for (n, key) in ["epicuria", "bplate", "deneve", "rendezvous"]
            .iter()
            .enumerate()
        {
            body.push_str(&format!(
                "&result_{n}_key={key}&result_{n}_title=T{n}&result_{n}_desc=D{n}"
            ));
        }
        body.push_str("&q0_prompt=Pick+a+meal");
        body.push_str("&q0_opt0_text=Pasta&q0_opt0_val=epicuria");
        body.push_str("&q0_opt1_text=Salad&q0_opt1_val=bplate");
        body
    }

    #[test]
    fn test_get_renders_form() {
        let (_dir, handler) = handler();
        let req = parse_request(b"GET /quiz/create HTTP/1.1\r\n\r\n");
        let res = handler.handle(&req);
        assert_eq!(res.status_code, 200);
        let body = String::from_utf8(res.body).unwrap();
        assert!(body.contains("name=\"quiz_id\""));
        assert!(body.contains("name=\"result_3_key\""));
    }

    #[test]
    fn test_post_writes_quiz_file() {
        let (dir, handler) = handler();
        let res = handler.handle(&post(&valid_submission()));
        assert_eq!(res.status_code, 200);

        let written = fs::read_to_string(dir.path().join("dining.json")).unwrap();
        let quiz: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(quiz["title"], "Which dining hall?");
        assert_eq!(quiz["questions"][0]["options"][1]["value"], "bplate");
        assert!(quiz["results"]["rendezvous"].is_object());
    }

    #[test]
    fn test_invalid_quiz_id_is_400() {
        let (_dir, handler) = handler();
        let body = valid_submission().replace("quiz_id=dining", "quiz_id=../evil");
        assert_eq!(handler.handle(&post(&body)).status_code, 400);
    }

    #[test]
    fn test_undecodable_field_names_the_field() {
        let (_dir, handler) = handler();
        let body = valid_submission().replace("title=Which+dining+hall%3F", "title=%FF%FE");
        let res = handler.handle(&post(&body));
        assert_eq!(res.status_code, 400);
        assert!(String::from_utf8(res.body)
            .unwrap()
            .contains("invalid characters in field: title"));
    }

    #[test]
    fn test_option_with_undefined_result_is_400() {
        let (_dir, handler) = handler();
        let body = valid_submission().replace("q0_opt1_val=bplate", "q0_opt1_val=mystery");
        let res = handler.handle(&post(&body));
        assert_eq!(res.status_code, 400);
        assert!(String::from_utf8(res.body).unwrap().contains("mystery"));
    }

    #[test]
    fn test_missing_result_is_400() {
        let (_dir, handler) = handler();
        let body = valid_submission().replace("&result_3_key=rendezvous", "&result_3_key=");
        assert_eq!(handler.handle(&post(&body)).status_code, 400);
    }

    #[test]
    fn test_no_questions_is_400() {
        let (_dir, handler) = handler();
        let body = valid_submission().replace("&q0_prompt=Pick+a+meal", "");
        // Options without a prompt are never reached; the quiz has no questions.
        assert_eq!(handler.handle(&post(&body)).status_code, 400);
    }

    #[test]
    fn test_other_uri_is_404() {
        let (_dir, handler) = handler();
        let req = parse_request(b"GET /quiz/other HTTP/1.1\r\n\r\n");
        assert_eq!(handler.handle(&req).status_code, 404);
    }

    #[test]
    fn test_unsupported_method_is_405() {
        let (_dir, handler) = handler();
        let req = parse_request(b"DELETE /quiz/create HTTP/1.1\r\n\r\n");
        assert_eq!(handler.handle(&req).status_code, 405);
    }
}
