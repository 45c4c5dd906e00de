//! Pipeline Controller — one-shot resume → portfolio run.
//!
//! Flow: Idle → Extracting → Inferring → Parsing → Packaging → Done.
//! Strictly forward; any failure ends the run and nothing is offered for download.

use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::llm_client::{Inference, LlmError};
use crate::models::site::{ParseTier, SiteAssets};
use crate::portfolio::extract::{looks_like_pdf, ExtractError, TextExtractor};
use crate::portfolio::linker::link_assets;
use crate::portfolio::packager::{PackageError, Packager};
use crate::portfolio::parser::parse_output;
use crate::portfolio::prompts::compose;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Extracting,
    Inferring,
    Parsing,
    Packaging,
    Done,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No resume uploaded")]
    NoUpload,

    #[error("Uploaded file is not a PDF")]
    NotPdf,

    #[error("No readable text in the uploaded PDF")]
    UnreadablePdf,

    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error(transparent)]
    Inference(#[from] LlmError),

    #[error(transparent)]
    Packaging(#[from] PackageError),
}

impl PipelineError {
    /// The stage the run was in when it failed.
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineError::NoUpload | PipelineError::NotPdf => PipelineStage::Idle,
            PipelineError::UnreadablePdf | PipelineError::Extraction(_) => {
                PipelineStage::Extracting
            }
            PipelineError::Inference(_) => PipelineStage::Inferring,
            PipelineError::Packaging(_) => PipelineStage::Packaging,
        }
    }
}

/// A single uploaded resume file.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl Upload {
    /// Accepts a `.pdf` name, an `application/pdf` content type, or a `%PDF` signature.
    pub fn is_pdf(&self) -> bool {
        let by_name = self
            .file_name
            .as_deref()
            .is_some_and(|n| n.to_ascii_lowercase().ends_with(".pdf"));
        let by_type = self
            .content_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("application/pdf"));
        by_name || by_type || looks_like_pdf(&self.bytes)
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct GeneratedSite {
    /// Assets as packaged, markup already linked.
    pub assets: SiteAssets,
    pub archive: Vec<u8>,
    pub tier: ParseTier,
}

#[derive(Clone)]
pub struct Pipeline {
    extractor: Arc<dyn TextExtractor>,
    llm: Arc<dyn Inference>,
    packager: Packager,
}

impl Pipeline {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        llm: Arc<dyn Inference>,
        packager: Packager,
    ) -> Self {
        Self {
            extractor,
            llm,
            packager,
        }
    }

    pub fn packager(&self) -> &Packager {
        &self.packager
    }

    /// Runs the whole pipeline once. Nothing is retried.
    pub async fn run(&self, upload: Option<Upload>) -> Result<GeneratedSite, PipelineError> {
        let run_id = Uuid::new_v4();
        let result = self
            .execute(upload)
            .instrument(info_span!("generate", %run_id))
            .await;

        if let Err(e) = &result {
            warn!(%run_id, stage = ?e.stage(), "Portfolio generation failed: {e}");
        }
        result
    }

    async fn execute(&self, upload: Option<Upload>) -> Result<GeneratedSite, PipelineError> {
        let upload = upload
            .filter(|u| !u.bytes.is_empty())
            .ok_or(PipelineError::NoUpload)?;
        if !upload.is_pdf() {
            return Err(PipelineError::NotPdf);
        }

        enter(PipelineStage::Extracting);
        let resume_text = self.extract(upload.bytes).await?;
        if resume_text.is_empty() {
            return Err(PipelineError::UnreadablePdf);
        }
        info!("Extracted {} characters of resume text", resume_text.len());

        enter(PipelineStage::Inferring);
        let messages = compose(&resume_text);
        let raw = self.llm.complete(&messages).await?;
        info!("Model replied with {} characters", raw.len());

        enter(PipelineStage::Parsing);
        let (mut assets, tier) = parse_output(&raw);
        assets.html = link_assets(&assets.html, assets.has_css(), assets.has_js());
        info!("Parsed site assets via {} tier", tier.as_str());

        enter(PipelineStage::Packaging);
        let archive = self.package(assets.clone()).await?;

        enter(PipelineStage::Done);
        Ok(GeneratedSite {
            assets,
            archive,
            tier,
        })
    }

    async fn extract(&self, bytes: Bytes) -> Result<String, ExtractError> {
        let extractor = Arc::clone(&self.extractor);
        tokio::task::spawn_blocking(move || extractor.extract(&bytes))
            .await
            .map_err(|e| ExtractError::Aborted(e.to_string()))?
    }

    async fn package(&self, assets: SiteAssets) -> Result<Vec<u8>, PackageError> {
        let packager = self.packager.clone();
        tokio::task::spawn_blocking(move || packager.package(&assets))
            .await
            .map_err(|e| PackageError::Io(std::io::Error::other(e.to_string())))?
    }
}

fn enter(stage: PipelineStage) {
    info!(?stage, "Pipeline stage");
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::io::{Cursor, Read};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::llm_client::PromptMessages;

    pub(crate) struct FixedText(pub &'static str);

    impl TextExtractor for FixedText {
        fn extract(&self, _bytes: &[u8]) -> Result<String, ExtractError> {
            Ok(self.0.trim().to_string())
        }
    }

    pub(crate) struct BrokenPdf;

    impl TextExtractor for BrokenPdf {
        fn extract(&self, _bytes: &[u8]) -> Result<String, ExtractError> {
            Err(ExtractError::Pdf("invalid xref table".to_string()))
        }
    }

    /// Replies with a canned string and records every prompt it sees.
    pub(crate) struct CannedModel {
        pub reply: Result<String, u16>,
        pub calls: AtomicUsize,
        pub last_user: std::sync::Mutex<Option<String>>,
    }

    impl CannedModel {
        pub(crate) fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
                last_user: std::sync::Mutex::new(None),
            })
        }

        pub(crate) fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(status),
                calls: AtomicUsize::new(0),
                last_user: std::sync::Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl Inference for CannedModel {
        async fn complete(&self, messages: &PromptMessages) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_user.lock().unwrap() = Some(messages.user().to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "quota exceeded".to_string(),
                }),
            }
        }
    }

    pub(crate) fn pdf_upload() -> Upload {
        Upload {
            file_name: Some("resume.pdf".to_string()),
            content_type: Some("application/pdf".to_string()),
            bytes: Bytes::from_static(b"%PDF-1.4 fake"),
        }
    }

    fn read_entry(archive: &[u8], name: &str) -> String {
        let mut zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
        let mut out = String::new();
        zip.by_name(name).unwrap().read_to_string(&mut out).unwrap();
        out
    }

    const MARKED_REPLY: &str =
        "--html--<html>...</html>--html--\n--css--body{}--css--\n--js--console.log(1)--js--";

    #[tokio::test]
    async fn test_end_to_end_markers() {
        let dir = tempfile::tempdir().unwrap();
        let model = CannedModel::replying(MARKED_REPLY);
        let pipeline = Pipeline::new(
            Arc::new(FixedText("Jane Doe, Software Engineer...")),
            model.clone(),
            Packager::new(dir.path()),
        );

        let site = pipeline.run(Some(pdf_upload())).await.unwrap();

        assert_eq!(site.tier, ParseTier::Markers);
        assert_eq!(site.assets.css, "body{}");
        assert_eq!(site.assets.js, "console.log(1)");
        // No </head>, so both references are prepended.
        assert_eq!(
            site.assets.html,
            "<link rel=\"stylesheet\" href=\"style.css\">\n\
             <script defer src=\"script.js\"></script>\n<html>...</html>"
        );

        assert_eq!(read_entry(&site.archive, "index.html"), site.assets.html);
        assert_eq!(read_entry(&site.archive, "style.css"), "body{}");
        assert_eq!(read_entry(&site.archive, "script.js"), "console.log(1)");
        assert_eq!(std::fs::read(dir.path().join("website.zip")).unwrap(), site.archive);

        assert_eq!(
            model.last_user.lock().unwrap().as_deref(),
            Some("Resume content:\nJane Doe, Software Engineer...")
        );
    }

    #[tokio::test]
    async fn test_fallback_reply_is_packaged_as_markup() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(
            Arc::new(FixedText("Jane")),
            CannedModel::replying("  <h1>Jane</h1>  "),
            Packager::new(dir.path()),
        );

        let site = pipeline.run(Some(pdf_upload())).await.unwrap();
        assert_eq!(site.tier, ParseTier::Fallback);
        assert_eq!(site.assets, SiteAssets::new("<h1>Jane</h1>", "", ""));
        assert_eq!(read_entry(&site.archive, "script.js"), "");
    }

    #[tokio::test]
    async fn test_missing_upload_halts_before_model() {
        let dir = tempfile::tempdir().unwrap();
        let model = CannedModel::replying(MARKED_REPLY);
        let pipeline = Pipeline::new(
            Arc::new(FixedText("Jane")),
            model.clone(),
            Packager::new(dir.path()),
        );

        let err = pipeline.run(None).await.unwrap_err();
        assert!(matches!(err, PipelineError::NoUpload));
        assert_eq!(err.stage(), PipelineStage::Idle);

        let empty = Upload {
            bytes: Bytes::new(),
            ..pdf_upload()
        };
        assert!(matches!(
            pipeline.run(Some(empty)).await.unwrap_err(),
            PipelineError::NoUpload
        ));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
        assert!(!dir.path().join("website.zip").exists());
    }

    #[tokio::test]
    async fn test_non_pdf_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(
            Arc::new(FixedText("Jane")),
            CannedModel::replying(MARKED_REPLY),
            Packager::new(dir.path()),
        );
        let upload = Upload {
            file_name: Some("resume.docx".to_string()),
            content_type: None,
            bytes: Bytes::from_static(b"PK\x03\x04"),
        };
        assert!(matches!(
            pipeline.run(Some(upload)).await.unwrap_err(),
            PipelineError::NotPdf
        ));
    }

    #[tokio::test]
    async fn test_blank_text_halts_before_model() {
        let dir = tempfile::tempdir().unwrap();
        let model = CannedModel::replying(MARKED_REPLY);
        let pipeline = Pipeline::new(
            Arc::new(FixedText("   \n  ")),
            model.clone(),
            Packager::new(dir.path()),
        );

        let err = pipeline.run(Some(pdf_upload())).await.unwrap_err();
        assert!(matches!(err, PipelineError::UnreadablePdf));
        assert_eq!(err.stage(), PipelineStage::Extracting);
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
        assert!(!dir.path().join("website.zip").exists());
    }

    #[tokio::test]
    async fn test_extraction_error_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        let model = CannedModel::replying(MARKED_REPLY);
        let pipeline = Pipeline::new(Arc::new(BrokenPdf), model.clone(), Packager::new(dir.path()));

        let err = pipeline.run(Some(pdf_upload())).await.unwrap_err();
        assert!(matches!(err, PipelineError::Extraction(ExtractError::Pdf(_))));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_model_failure_is_not_retried() {
        let dir = tempfile::tempdir().unwrap();
        let model = CannedModel::failing(429);
        let pipeline = Pipeline::new(
            Arc::new(FixedText("Jane")),
            model.clone(),
            Packager::new(dir.path()),
        );

        let err = pipeline.run(Some(pdf_upload())).await.unwrap_err();
        assert_eq!(err.stage(), PipelineStage::Inferring);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
        assert!(!dir.path().join("index.html").exists());
    }

    #[tokio::test]
    async fn test_packaging_failure_offers_nothing() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the output directory should be.
        let blocked = dir.path().join("not-a-dir");
        std::fs::write(&blocked, b"x").unwrap();

        let pipeline = Pipeline::new(
            Arc::new(FixedText("Jane")),
            CannedModel::replying(MARKED_REPLY),
            Packager::new(&blocked),
        );

        let err = pipeline.run(Some(pdf_upload())).await.unwrap_err();
        assert!(matches!(err, PipelineError::Packaging(_)));
        assert_eq!(err.stage(), PipelineStage::Packaging);
    }

    #[test]
    fn test_upload_pdf_detection() {
        let by_sig = Upload {
            file_name: None,
            content_type: None,
            bytes: Bytes::from_static(b"%PDF-1.7"),
        };
        assert!(by_sig.is_pdf());

        let by_name = Upload {
            file_name: Some("CV.PDF".to_string()),
            content_type: None,
            bytes: Bytes::from_static(b"junk"),
        };
        assert!(by_name.is_pdf());

        let by_type = Upload {
            file_name: None,
            content_type: Some("application/pdf".to_string()),
            bytes: Bytes::from_static(b"junk"),
        };
        assert!(by_type.is_pdf());
    }
}
