#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display() {
        let err = CoreError::Validation("ammo box has no stack slot".into());
        assert_eq!(err.to_string(), "Validation failed: ammo box has no stack slot");
    }
}
