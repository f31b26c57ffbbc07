//! Log commands

use crate::LogClient;
use crate::error::Result;
use tasklog_core::dto::log::{
    GetAppIdRequest, GetAppIdResponse, GetLogBytesRequest, GetLogBytesResponse,
    RemoveTaskLogRequest, RemoveTaskLogResponse, RollViewLogRequest, RollViewLogResponse,
    ViewLogRequest, ViewLogResponse,
};

impl LogClient {
    // =============================================================================
    // Reading
    // =============================================================================

    /// View a whole log file as text
    ///
    /// # Arguments
    /// * `path` - Absolute path of the log file on the worker
    ///
    /// # Returns
    /// The file content with every line terminated by `\r\n`. A file the
    /// worker failed to read comes back empty.
    pub async fn view_log(&self, path: &str) -> Result<String> {
        let request = ViewLogRequest {
            path: path.to_string(),
        };
        let response: ViewLogResponse = self.send_sync(&request).await?;

        Ok(response.content)
    }

    /// View a window of lines from a log file
    ///
    /// Path and file problems are reported in the response status rather
    /// than as an error.
    ///
    /// # Arguments
    /// * `path` - Absolute path of the log file on the worker
    /// * `skip_line_num` - Number of lines to skip from the start
    /// * `limit` - Maximum number of lines to return
    ///
    /// # Example
    /// ```no_run
    /// # use tasklog_client::{LogClient, RollViewLogStatus};
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = LogClient::connect("127.0.0.1:1234").await?;
    /// let window = client.roll_view_log("/opt/worker/logs/1.log", 100, 50).await?;
    /// if window.status == RollViewLogStatus::Ok {
    ///     println!("{} of {} lines", window.current_line_number, window.current_total_line_number);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn roll_view_log(
        &self,
        path: &str,
        skip_line_num: u32,
        limit: u32,
    ) -> Result<RollViewLogResponse> {
        let request = RollViewLogRequest {
            path: path.to_string(),
            skip_line_num,
            limit,
        };

        self.send_sync(&request).await
    }

    /// Download a whole log file as raw bytes
    pub async fn get_log_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let request = GetLogBytesRequest {
            path: path.to_string(),
        };
        let response: GetLogBytesResponse = self.send_sync(&request).await?;

        Ok(response.bytes)
    }

    /// Extract application ids embedded in a log file
    pub async fn get_app_ids(&self, log_path: &str) -> Result<Vec<String>> {
        let request = GetAppIdRequest {
            log_path: log_path.to_string(),
        };
        let response: GetAppIdResponse = self.send_sync(&request).await?;

        Ok(response.app_ids)
    }

    // =============================================================================
    // Cleanup
    // =============================================================================

    /// Remove a task's log file from the worker
    ///
    /// # Returns
    /// `true` if the file is gone afterwards (including when it never existed)
    pub async fn remove_task_log(&self, path: &str) -> Result<bool> {
        let request = RemoveTaskLogRequest {
            path: path.to_string(),
        };
        let response: RemoveTaskLogResponse = self.send_sync(&request).await?;

        Ok(response.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fake_worker;
    use crate::{ClientError, RollViewLogStatus};
    use tasklog_core::ProtocolError;
    use tasklog_core::domain::command::{Command, CommandType};
    use tasklog_core::dto::CommandBody;

    #[tokio::test]
    async fn test_view_log() {
        let addr = fake_worker(|command| {
            let request = ViewLogRequest::from_command(&command).unwrap();
            let content = format!("viewing {}\r\n", request.path);
            vec![ViewLogResponse { content }.convert_to_command(command.opaque).unwrap()]
        })
        .await;
        let client = LogClient::connect(addr).await.unwrap();

        let content = client.view_log("/opt/worker/logs/a.log").await.unwrap();
        assert_eq!(content, "viewing /opt/worker/logs/a.log\r\n");
    }

    #[tokio::test]
    async fn test_roll_view_log_sends_window() {
        let addr = fake_worker(|command| {
            let request = RollViewLogRequest::from_command(&command).unwrap();
            assert_eq!(request.skip_line_num, 2);
            assert_eq!(request.limit, 2);
            vec![
                RollViewLogResponse::ok(4, 5, "3\r\n4".to_string())
                    .convert_to_command(command.opaque)
                    .unwrap(),
            ]
        })
        .await;
        let client = LogClient::connect(addr).await.unwrap();

        let window = client.roll_view_log("/opt/worker/t1.log", 2, 2).await.unwrap();
        assert_eq!(window.status, RollViewLogStatus::Ok);
        assert_eq!(window.current_line_number, 4);
        assert_eq!(window.current_total_line_number, 5);
        assert_eq!(window.log, "3\r\n4");
    }

    #[tokio::test]
    async fn test_stale_responses_are_skipped() {
        let addr = fake_worker(|command| {
            let stale = RemoveTaskLogResponse { status: false }
                .convert_to_command(command.opaque + 1000)
                .unwrap();
            let fresh = RemoveTaskLogResponse { status: true }
                .convert_to_command(command.opaque)
                .unwrap();
            vec![stale, fresh]
        })
        .await;
        let client = LogClient::connect(addr).await.unwrap();

        assert!(client.remove_task_log("/opt/worker/a.log").await.unwrap());
    }

    #[tokio::test]
    async fn test_each_request_gets_a_new_opaque() {
        let addr = fake_worker(|command| {
            let app_ids = vec![format!("application_{}", command.opaque)];
            vec![GetAppIdResponse { app_ids }.convert_to_command(command.opaque).unwrap()]
        })
        .await;
        let client = LogClient::connect(addr).await.unwrap();

        let first = client.get_app_ids("/opt/worker/a.log").await.unwrap();
        let second = client.get_app_ids("/opt/worker/a.log").await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_get_log_bytes() {
        let addr = fake_worker(|command| {
            vec![
                GetLogBytesResponse {
                    bytes: vec![0, 159, 146, 150],
                }
                .convert_to_command(command.opaque)
                .unwrap(),
            ]
        })
        .await;
        let client = LogClient::connect(addr).await.unwrap();

        let bytes = client.get_log_bytes("/opt/worker/a.log").await.unwrap();
        assert_eq!(bytes, vec![0, 159, 146, 150]);
    }

    #[tokio::test]
    async fn test_wrong_response_type_is_an_error() {
        let addr = fake_worker(|command| {
            vec![Command::new(
                CommandType::ViewWholeLogResponse,
                command.opaque,
                b"{\"content\":\"\"}".to_vec(),
            )]
        })
        .await;
        let client = LogClient::connect(addr).await.unwrap();

        let result = client.get_app_ids("/opt/worker/a.log").await;
        assert!(matches!(
            result,
            Err(ClientError::Protocol(ProtocolError::UnexpectedCommandType { .. }))
        ));
    }

    #[tokio::test]
    async fn test_rejection_surfaces_as_closed_connection() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let _ = tasklog_core::codec::read_command(&mut stream).await;
            // Dropping the stream closes the connection without a response
        });
        let client = LogClient::connect(addr).await.unwrap();

        let result = client.view_log("/etc/passwd").await;
        assert!(result.unwrap_err().is_connection_closed());
    }
}
