use std::io::Read;
use std::time::Duration;

use ureq::Error::{Status, Transport};

use super::{FileDownloader, Response};

pub struct UReqFetcher {
    agent: ureq::Agent,
}

impl FileDownloader for UReqFetcher {
    fn fetch(&self, url: &str) -> Response {
        let response = self.agent.get(url).call();

        match response {
            Ok(response) if !(200..300).contains(&response.status()) => {
                Response::status(response.status())
            }

            Ok(response) => {
                tracing::trace!(
                    url,
                    status = response.status(),
                    content_type = response.header("Content-Type"),
                    "Response received"
                );

                let mut body = Vec::new();

                if let Err(error) = response.into_reader().read_to_end(&mut body) {
                    return Response::invalid_body(error.to_string());
                }

                Response::ok(body)
            }

            Err(Status(code, _)) => Response::status(code),

            Err(Transport(transport)) => Response::network_error(transport.to_string()),
        }
    }
}

impl UReqFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(user_agent)
            .build();

        UReqFetcher { agent }
    }
}
