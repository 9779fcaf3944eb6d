//! Quiz listing and rendering.
//!
//! # Responsibilities
//! - GET /quiz: list the quizzes found under the quiz root
//! - GET /quiz/<id>: render a quiz's question form
//!
//! # Design Decisions
//! - Quizzes are plain JSON files, `<quiz_root>/<id>.json`; an optional
//!   `<id>.jpg` next to one becomes its cover image
//! - All user-visible text is HTML-escaped before embedding

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{escape_html, Handler};
use crate::http::{Request, Response};

pub struct QuizHandler {
    quiz_root: PathBuf,
}

impl QuizHandler {
    pub fn new(quiz_root: &str) -> Self {
        // Canonicalize when possible so rendered paths are stable.
        let quiz_root = Path::new(quiz_root)
            .canonicalize()
            .unwrap_or_else(|_| PathBuf::from(quiz_root));
        tracing::info!(root = %quiz_root.display(), "quiz handler initialized");
        Self { quiz_root }
    }

    pub fn create(args: &HashMap<String, String>) -> Option<Box<dyn Handler>> {
        let quiz_root = args.get("quiz_root")?;
        Some(Box::new(Self::new(quiz_root)))
    }

    fn render_index(&self) -> Response {
        let entries = match fs::read_dir(&self.quiz_root) {
            Ok(entries) => entries,
            Err(error) => {
                tracing::error!(%error, "failed to read quiz directory");
                return Response::plain_text(
                    500,
                    "Internal Server Error",
                    "Failed to list quizzes.",
                );
            }
        };

        let mut body = String::new();
        body.push_str("<html><head><title>Quizzes</title>");
        body.push_str(
            "<link rel=\"stylesheet\" type=\"text/css\" href=\"/static/quizzes/styles.css\">",
        );
        body.push_str("</head><body><div class='container'>");
        body.push_str("<h1>Quizzes</h1>");
        body.push_str("<div style='margin-bottom: 20px; text-align: left;'>");
        body.push_str("<a href=\"/quiz/create\" class=\"create-quiz-button\">Create Quiz</a>");
        body.push_str("</div>");
        body.push_str("<p>Select a quiz below to get started:</p><ul>");

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"))
            .filter_map(|entry| {
                entry
                    .path()
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
            })
            .collect();
        names.sort();

        for name in names {
            body.push_str("<div style='margin-bottom: 30px; text-align: center;'>");
            if self.quiz_root.join(format!("{name}.jpg")).exists() {
                body.push_str(&format!(
                    "<img src=\"/static/quizzes/{name}.jpg\" \
                     style=\"max-width: 100%; width: 500px; height: auto; \
                     border-radius: 12px; display: block; margin: 0 auto;\" />"
                ));
            }
            body.push_str(&format!(
                "<a href=\"/quiz/{name}\" class='quiz-title'>{}</a>",
                escape_html(&name)
            ));
            body.push_str("</div>");
        }

        body.push_str("</ul></div></body></html>");
        Response::html(body)
    }

    fn render_quiz(&self, quiz_id: &str) -> Response {
        let quiz_file = self.quiz_root.join(format!("{quiz_id}.json"));
        tracing::info!(path = %quiz_file.display(), "looking for quiz");

        let contents = match fs::read_to_string(&quiz_file) {
            Ok(contents) => contents,
            Err(_) => return Response::plain_text(404, "Not Found", "Quiz not found."),
        };
        let quiz: Value = match serde_json::from_str(&contents) {
            Ok(quiz) => quiz,
            Err(_) => {
                return Response::plain_text(
                    500,
                    "Internal Server Error",
                    "Failed to parse quiz file.",
                )
            }
        };

        let title = quiz["title"].as_str().unwrap_or(quiz_id);
        let mut body = String::new();
        body.push_str(
            "<html><head><link rel=\"stylesheet\" href=\"/static/quizzes/styles.css\"></head>\
             <body><div class='container'>",
        );
        body.push_str(&format!("<h1>{}</h1>", escape_html(title)));
        body.push_str("<form action=\"/quiz/submit\" method=\"POST\">");

        let empty = Vec::new();
        let questions = quiz["questions"].as_array().unwrap_or(&empty);
        for (q_num, question) in questions.iter().enumerate() {
            if let Some(image) = question["image"].as_str() {
                body.push_str("<div style='text-align: center; margin-bottom: 15px;'>");
                body.push_str(&format!(
                    "<img src=\"/static/quizzes/{}\" style=\"max-width: 100%; width: 400px; \
                     height: auto; border-radius: 8px; box-shadow: 0 4px 8px rgba(0,0,0,0.1);\" />",
                    escape_html(image)
                ));
                body.push_str("</div>");
            }
            body.push_str(&format!(
                "<p>{}</p>",
                escape_html(question["prompt"].as_str().unwrap_or(""))
            ));
            body.push_str("<div class='quiz-options'>");
            for option in question["options"].as_array().unwrap_or(&empty) {
                body.push_str("<label class='quiz-option'>");
                body.push_str(&format!(
                    "<input type=\"radio\" name=\"q{q_num}\" value='{}' />",
                    escape_html(option["value"].as_str().unwrap_or(""))
                ));
                body.push_str(&format!(
                    "<span>{}</span>",
                    escape_html(option["text"].as_str().unwrap_or(""))
                ));
                body.push_str("</label>");
            }
            body.push_str("</div>");
        }

        body.push_str(&format!(
            "<input type=\"hidden\" name=\"quiz_id\" value=\"{quiz_id}\">"
        ));
        body.push_str("<input type=\"submit\" value=\"Submit\">");
        body.push_str("</form></div></body></html>");

        Response::html(body)
    }
}

impl Handler for QuizHandler {
    fn handle(&self, req: &Request) -> Response {
        if req.uri == "/quiz" {
            self.render_index()
        } else if let Some(quiz_id) = req.uri.strip_prefix("/quiz/") {
            self.render_quiz(quiz_id)
        } else {
            Response::plain_text(404, "Not Found", "Page not found.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::parse_request;

    const QUIZ: &str = r#"{
        "title": "Which <dining hall> are you?",
        "questions": [
            {
                "prompt": "Pick a meal",
                "options": [
                    {"text": "Pasta", "value": "epicuria"},
                    {"text": "Burgers", "value": "bplate"}
                ]
            }
        ],
        "results": {
            "epicuria": {"title": "Epicuria", "description": "Pasta person"},
            "bplate": {"title": "BPlate", "description": "Health person"}
        }
    }"#;

    fn handler_with_quiz() -> (tempfile::TempDir, QuizHandler) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("dining.json"), QUIZ).unwrap();
        let handler = QuizHandler::new(dir.path().to_str().unwrap());
        (dir, handler)
    }

    fn get(uri: &str) -> Request {
        parse_request(format!("GET {uri} HTTP/1.1\r\n\r\n").as_bytes())
    }

    #[test]
    fn test_index_lists_quizzes() {
        let (_dir, handler) = handler_with_quiz();
        let res = handler.handle(&get("/quiz"));
        assert_eq!(res.status_code, 200);
        let body = String::from_utf8(res.body).unwrap();
        assert!(body.contains("/quiz/dining"));
    }

    #[test]
    fn test_quiz_form_renders_escaped() {
        let (_dir, handler) = handler_with_quiz();
        let res = handler.handle(&get("/quiz/dining"));
        assert_eq!(res.status_code, 200);
        let body = String::from_utf8(res.body).unwrap();
        assert!(body.contains("Which &lt;dining hall&gt; are you?"));
        assert!(body.contains("name=\"q0\""));
        assert!(body.contains("name=\"quiz_id\" value=\"dining\""));
    }

    #[test]
    fn test_unknown_quiz_is_404() {
        let (_dir, handler) = handler_with_quiz();
        assert_eq!(handler.handle(&get("/quiz/none")).status_code, 404);
    }

    #[test]
    fn test_corrupt_quiz_is_500() {
        let (dir, handler) = handler_with_quiz();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        assert_eq!(handler.handle(&get("/quiz/broken")).status_code, 500);
    }

    #[test]
    fn test_other_uri_is_404() {
        let (_dir, handler) = handler_with_quiz();
        assert_eq!(handler.handle(&get("/quizzes")).status_code, 404);
    }
}
