use lexai_core::domain::DocumentStatus;
use lexai_core::intake::{
    screen_batch, validate_file, CandidateFile, RejectionReason, ALLOWED_MIME_TYPES,
    MAX_UPLOAD_BYTES,
};
use lexai_core::status::status_gate;
use proptest::prelude::*;
use proptest::test_runner::Config;

fn status_strategy() -> impl Strategy<Value = DocumentStatus> {
    prop::sample::select(DocumentStatus::ALL.to_vec())
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn disallowed_mime_is_rejected_and_excluded(
        mime in "[a-z]{1,12}/[a-z0-9.+-]{1,24}",
        size in 0_u64..MAX_UPLOAD_BYTES,
    ) {
        prop_assume!(!ALLOWED_MIME_TYPES.contains(&mime.as_str()));
        let bad = CandidateFile::new("upload.bin", mime, size);
        let good = CandidateFile::new("brief.pdf", "application/pdf", 1);
        prop_assert_eq!(
            validate_file(&bad).map_err(|r| r.reason),
            Err(RejectionReason::UnsupportedType)
        );

        let out = screen_batch(vec![bad, good], |f| f);
        prop_assert_eq!(out.accepted.len(), 1);
        prop_assert_eq!(out.accepted[0].name.as_str(), "brief.pdf");
        prop_assert_eq!(out.rejected[0].file_name.as_str(), "upload.bin");
    }

    #[test]
    fn oversized_allowed_type_is_too_large(
        idx in 0_usize..ALLOWED_MIME_TYPES.len(),
        extra in 1_u64..(1_u64 << 40),
    ) {
        let f = CandidateFile::new("big", ALLOWED_MIME_TYPES[idx], MAX_UPLOAD_BYTES + extra);
        prop_assert_eq!(validate_file(&f).map_err(|r| r.reason), Err(RejectionReason::TooLarge));
    }

    #[test]
    fn can_view_iff_processed(status in status_strategy()) {
        prop_assert_eq!(status_gate(status).can_view, status == DocumentStatus::Processed);
        prop_assert!(status_gate(status).can_download);
        prop_assert!(status_gate(status).can_delete);
    }
}

#[test]
fn forty_and_sixty_megabyte_pdfs() {
    const MB: u64 = 1024 * 1024;
    let out = screen_batch(
        vec![
            CandidateFile::new("forty.pdf", "application/pdf", 40 * MB),
            CandidateFile::new("sixty.pdf", "application/pdf", 60 * MB),
        ],
        |f| f,
    );
    assert_eq!(out.accepted.len(), 1);
    assert_eq!(out.accepted[0].name, "forty.pdf");
    assert_eq!(out.rejected.len(), 1);
    let notice = out.rejected[0].notice();
    assert_eq!(notice.title, "File too large");
    assert_eq!(notice.description, "File \"sixty.pdf\" exceeds the 50MB limit.");
}
