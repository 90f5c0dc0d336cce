#[cfg(test)]
mod flow_test {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::auth::interface::AuthError;
    use crate::login_flow::core::{
        Event, State, MISSING_FIELDS_MESSAGE, NETWORK_ERROR_MESSAGE, TIMEOUT_MESSAGE,
    };
    use crate::login_flow::tests::fixture::Fixture;

    const WAIT: Duration = Duration::from_secs(3);

    fn submit(username: &str, password: &str) -> Event {
        Event::Submit {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_login_redirects() {
        let f = Fixture::new();
        let authenticator = Arc::new(f.authenticator());
        let (sender, handle) = f.start(authenticator.clone());

        sender.send(submit(" ada ", "secret")).unwrap();

        let model = handle.join().unwrap();
        assert_eq!(
            model.state,
            State::Redirected {
                url: "/camera".to_string()
            }
        );
        assert_eq!(f.view.snapshot().navigations, vec!["/camera".to_string()]);
        assert_eq!(authenticator.calls(), 1);
    }

    #[test]
    fn test_empty_field_never_calls_server() {
        let f = Fixture::new();
        let authenticator = Arc::new(f.authenticator());
        let (sender, handle) = f.start(authenticator.clone());

        sender.send(submit("ada", "   ")).unwrap();

        assert!(f
            .view
            .wait_until(WAIT, |s| s.messages_shown.contains(&MISSING_FIELDS_MESSAGE.to_string())));
        sender.send(Event::Unload).unwrap();
        handle.join().unwrap();
        assert_eq!(authenticator.calls(), 0);
    }

    #[test]
    fn test_rejection_message_auto_hides() {
        let f = Fixture::new();
        let (sender, handle) = f.start(Arc::new(f.authenticator()));

        sender.send(submit("ada", "wrong")).unwrap();

        assert!(f
            .view
            .wait_until(WAIT, |s| s.messages_shown == vec!["Invalid credentials".to_string()]));
        assert!(f.view.wait_until(WAIT, |s| s.message.is_none()));

        sender.send(Event::Unload).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_new_message_is_not_hidden_by_older_timer() {
        let f = Fixture::new();
        let (sender, handle) = f.start(Arc::new(f.authenticator()));

        sender.send(submit("", "")).unwrap();
        std::thread::sleep(Duration::from_millis(60));
        sender.send(submit("ada", "wrong")).unwrap();

        assert!(f
            .view
            .wait_until(WAIT, |s| s.message.as_deref() == Some("Invalid credentials")));
        // Past the first message's deadline but inside the second's.
        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(
            f.view.snapshot().message.as_deref(),
            Some("Invalid credentials")
        );

        sender.send(Event::Unload).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_network_error_is_generic() {
        let f = Fixture::new();
        let authenticator = f
            .authenticator()
            .with_failure(AuthError::Transport("connection refused".to_string()));
        let (sender, handle) = f.start(Arc::new(authenticator));

        sender.send(submit("ada", "secret")).unwrap();

        assert!(f
            .view
            .wait_until(WAIT, |s| s.messages_shown.contains(&NETWORK_ERROR_MESSAGE.to_string())));
        sender.send(Event::Unload).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_hung_request_times_out() {
        let f = Fixture::new();
        let authenticator = f.authenticator().with_delay(Duration::from_secs(1));
        let (sender, handle) = f.start(Arc::new(authenticator));

        sender.send(submit("ada", "secret")).unwrap();

        assert!(f
            .view
            .wait_until(WAIT, |s| s.messages_shown.contains(&TIMEOUT_MESSAGE.to_string())));
        sender.send(Event::Unload).unwrap();
        let model = handle.join().unwrap();

        assert_eq!(model.state, State::Closed);
        assert!(f.view.snapshot().navigations.is_empty());
    }
}
