use crate::error::AppError;

/// Literal text the store renders on its blocking page. Appears verbatim in
/// the markup whether the block happens on first load or mid-pagination.
const SERVICE_BLOCK_SIGNATURE: &str = "현재 서비스 접속이 불가합니다";

/// Inspects rendered markup for the blocking-page signature.
///
/// A hit is a hard stop distinct from "no reviews found": the caller must
/// abort the run before extracting anything, so a blocked run can never be
/// mistaken for an empty result.
pub fn ensure_available(html: &str) -> Result<(), AppError> {
    if html.contains(SERVICE_BLOCK_SIGNATURE) {
        return Err(AppError::ServiceUnavailable);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocking_signature_aborts() {
        let html = format!("<html><body><p>{SERVICE_BLOCK_SIGNATURE}.</p></body></html>");
        assert!(matches!(
            ensure_available(&html),
            Err(AppError::ServiceUnavailable)
        ));
    }

    #[test]
    fn ordinary_pages_pass() {
        assert!(ensure_available("<html><body>리뷰 1,234</body></html>").is_ok());
        assert!(ensure_available("").is_ok());
    }
}
