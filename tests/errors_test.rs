#[cfg(test)]
mod error_tests {
    use docscan::errors::ScanError;
    use docscan::SessionState;
    use std::error::Error;

    #[test]
    fn test_invalid_buffer_length_message() {
        let error = ScanError::InvalidBufferLength {
            width: 2,
            height: 2,
            expected: 16,
            actual: 12,
        };
        assert_eq!(
            error.to_string(),
            "Invalid buffer length for 2x2: expected 16 bytes, got 12"
        );
    }

    #[test]
    fn test_transition_message() {
        let error = ScanError::InvalidTransition {
            state: SessionState::Captured,
            action: "start the camera",
        };
        assert_eq!(error.to_string(), "Cannot start the camera while session is Captured");
    }

    #[test]
    fn test_frame_too_small_message() {
        let error = ScanError::FrameTooSmall { width: 4, height: 3 };
        assert!(error.to_string().contains("4x3"));
    }

    #[test]
    fn test_config_error_display() {
        let error = ScanError::Config("bad value".to_string());
        assert_eq!(format!("{}", error), "Configuration error: bad value");
        assert!(format!("{:?}", error).contains("Config"));
    }

    #[test]
    fn test_io_error_conversion_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: ScanError = io.into();
        assert!(matches!(error, ScanError::Io(_)));
        assert!(error.to_string().contains("missing"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_plain_errors_have_no_source() {
        let error = ScanError::SourceNotReady;
        let _error_trait: &dyn Error = &error;
        assert!(error.source().is_none());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ScanError>();
    }
}
