use reqwest::Client;
use url::Url;

use crate::filters::{OracleError, ReputationOracle};

use super::protocol::{
    build_comment_check, comment_check_url, interpret_comment_check, interpret_verify_key,
    RequestContext, VerifyKey, DEBUG_HELP_HEADER, VERIFY_KEY_URL,
};

#[derive(Clone)]
pub struct AkismetClient {
    http: Client,
    api_key: String,
    blog: Url,
    context: RequestContext,
    comment_check_url: String,
    verify_key_url: String,
}

impl AkismetClient {
    pub fn new(http: Client, api_key: impl Into<String>, blog: Url) -> Self {
        let api_key = api_key.into();
        Self {
            http,
            comment_check_url: comment_check_url(&api_key),
            verify_key_url: VERIFY_KEY_URL.to_string(),
            api_key,
            blog,
            context: RequestContext::default(),
        }
    }

    pub fn with_request_context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }

    // e.g. a local relay in front of rest.akismet.com
    pub fn with_endpoints(mut self, comment_check: Url, verify_key: Url) -> Self {
        self.comment_check_url = comment_check.into();
        self.verify_key_url = verify_key.into();
        self
    }

    pub async fn verify_key(&self) -> Result<bool, OracleError> {
        let body = self
            .http
            .post(&self.verify_key_url)
            .form(&VerifyKey {
                key: &self.api_key,
                blog: self.blog.as_str(),
            })
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        interpret_verify_key(&body)
    }
}

impl ReputationOracle for AkismetClient {
    async fn is_spam(&self, author: &str, email: &str, content: &str) -> Result<bool, OracleError> {
        let request = build_comment_check(self.blog.as_str(), &self.context, author, email, content);
        let response = self
            .http
            .post(&self.comment_check_url)
            .form(&request)
            .send()
            .await?
            .error_for_status()?;

        let debug_help = response
            .headers()
            .get(DEBUG_HELP_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;
        interpret_comment_check(&body, debug_help)
    }
}

#[cfg(test)]
mod tests {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    use super::*;

    // Answers exactly one request and hands back what was received.
    async fn serve_once(
        status: &'static str,
        headers: &'static str,
        body: &'static str,
    ) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = Url::parse(&format!("http://{}/", listener.local_addr().unwrap())).unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let read = socket.read(&mut chunk).await.unwrap();
                if read == 0 {
                    break;
                }
                received.extend_from_slice(&chunk[..read]);
                if request_complete(&received) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n{headers}\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&received).into_owned()
        });
        (base, handle)
    }

    fn request_complete(received: &[u8]) -> bool {
        let text = String::from_utf8_lossy(received);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };
        let length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        body.len() >= length
    }

    fn client(base: &Url) -> AkismetClient {
        AkismetClient::new(
            Client::new(),
            "abc123",
            Url::parse("https://forms.example.com/").unwrap(),
        )
        .with_endpoints(
            base.join("1.1/comment-check").unwrap(),
            base.join("1.1/verify-key").unwrap(),
        )
    }

    #[tokio::test]
    async fn comment_check_posts_form_fields() {
        let (base, server) = serve_once("200 OK", "", "true").await;
        let client = client(&base).with_request_context(RequestContext {
            user_ip: Some("203.0.113.9".into()),
            user_agent: None,
        });

        let verdict = client.is_spam("Ann", "ann@example.com", "buy now").await.unwrap();
        assert!(verdict);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /1.1/comment-check "));
        assert!(request.contains("comment_type=contact-form"));
        assert!(request.contains("comment_author=Ann"));
        assert!(request.contains("comment_author_email=ann%40example.com"));
        assert!(request.contains("comment_content=buy+now"));
        assert!(request.contains("user_ip=203.0.113.9"));
        assert!(!request.contains("user_agent="));
    }

    #[tokio::test]
    async fn comment_check_ham_answer() {
        let (base, server) = serve_once("200 OK", "", "false").await;
        assert!(!client(&base).is_spam("Ann", "", "hello").await.unwrap());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn comment_check_surfaces_debug_help() {
        let (base, server) = serve_once(
            "200 OK",
            "X-akismet-debug-help: Empty \"blog\" value\r\n",
            "",
        )
        .await;
        match client(&base).is_spam("Ann", "", "hello").await {
            Err(OracleError::UnexpectedResponse { debug_help, .. }) => {
                assert_eq!(debug_help.as_deref(), Some("Empty \"blog\" value"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn server_error_status_is_an_http_error() {
        let (base, server) = serve_once("500 Internal Server Error", "", "oops").await;
        assert!(matches!(
            client(&base).is_spam("Ann", "", "hello").await,
            Err(OracleError::Http(_))
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn verify_key_posts_key_and_blog() {
        let (base, server) = serve_once("200 OK", "", "valid").await;
        assert!(client(&base).verify_key().await.unwrap());

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /1.1/verify-key "));
        assert!(request.contains("key=abc123"));
        assert!(request.contains("blog=https%3A%2F%2Fforms.example.com%2F"));
    }

    #[tokio::test]
    async fn verify_key_rejected() {
        let (base, server) = serve_once("200 OK", "", "invalid").await;
        assert!(!client(&base).verify_key().await.unwrap());
        server.await.unwrap();
    }
}
