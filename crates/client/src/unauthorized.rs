//! Forced logout for sessions that cannot be recovered

use crate::ApiClient;
use crate::client::include_credentials;
use crate::platform::boxed;

impl ApiClient {
    /// Tear down a dead session and send the user back to the app root
    ///
    /// Clears the cached refresh token, fires a best-effort logout call in the
    /// background, then navigates to the app root (or reloads when already
    /// there). Navigation does not wait for the logout call. Does nothing
    /// without an interactive session.
    pub fn handle_unauthorized(&self) {
        let platform = &self.inner.platform;
        if !platform.is_interactive() {
            debug!("Ignoring unauthorized session without an interactive session");
            return;
        }

        info!("Session could not be recovered, forcing logout");
        self.inner.session.clear();

        let logout = include_credentials(
            self.inner
                .http
                .post(self.api_url(&self.inner.logout_path)),
        );
        platform.spawn_detached(boxed(async move {
            match logout.send().await {
                Ok(response) => debug!(status = %response.status(), "Logout call completed"),
                Err(err) => debug!(error = %err, "Logout call failed"),
            }
        }));

        let root = self.inner.app_root.as_str();
        if platform.current_path().as_deref() == Some(root) {
            platform.reload();
        } else {
            platform.navigate(root);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ApiClient;
    use crate::platform::MockPlatform;
    use mockall::Sequence;
    use std::sync::Arc;

    fn client_with(platform: MockPlatform) -> ApiClient {
        let client = ApiClient::builder()
            .base_url("http://127.0.0.1:9")
            .platform(Arc::new(platform))
            .build()
            .unwrap();
        client.set_refresh_token(Some("rt-1".into()));
        client
    }

    #[test]
    fn test_noop_without_interactive_session() {
        let mut platform = MockPlatform::new();
        platform.expect_is_interactive().return_const(false);

        let client = client_with(platform);
        client.handle_unauthorized();

        assert_eq!(client.refresh_token().as_deref(), Some("rt-1"));
    }

    #[test]
    fn test_navigates_to_root_after_spawning_logout() {
        let mut seq = Sequence::new();
        let mut platform = MockPlatform::new();
        platform.expect_is_interactive().return_const(true);
        platform
            .expect_spawn_detached()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_task| ());
        platform
            .expect_current_path()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Some("/medicines".to_string()));
        platform
            .expect_navigate()
            .withf(|path| path == "/")
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let client = client_with(platform);
        client.handle_unauthorized();

        assert!(client.refresh_token().is_none());
    }

    #[test]
    fn test_reloads_when_already_at_root() {
        let mut platform = MockPlatform::new();
        platform.expect_is_interactive().return_const(true);
        platform.expect_spawn_detached().times(1).returning(|_task| ());
        platform
            .expect_current_path()
            .returning(|| Some("/".to_string()));
        platform.expect_reload().times(1).return_const(());

        let client = client_with(platform);
        client.handle_unauthorized();

        assert!(client.refresh_token().is_none());
    }

    #[test]
    fn test_custom_app_root() {
        let mut platform = MockPlatform::new();
        platform.expect_is_interactive().return_const(true);
        platform.expect_spawn_detached().returning(|_task| ());
        platform.expect_current_path().returning(|| None);
        platform
            .expect_navigate()
            .withf(|path| path == "/admin")
            .times(1)
            .return_const(());

        let client = ApiClient::builder()
            .base_url("http://127.0.0.1:9")
            .app_root("admin")
            .platform(Arc::new(platform))
            .build()
            .unwrap();
        client.handle_unauthorized();
    }
}
