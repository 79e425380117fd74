//! Turning a submitted form into an email for the administrator.

use askama::Template;
use tracing::info;

use super::error::ContributionError;
use super::form::ContributionForm;
use super::resend::Email;
use super::{ImageHost, Notifier};

/// Sender shown on contribution emails.
const SENDER: &str = "Redat Contributions <onboarding@resend.dev>";

/// A hosted photo and what it shows.
#[derive(Debug, Clone)]
pub struct ImageLink {
    pub label: String,
    pub url: String,
}

/// Body of the email sent for each contribution.
#[derive(Template)]
#[template(path = "contribution_email.html")]
pub struct ContributionEmail<'a> {
    pub start_station: &'a str,
    pub end_station: &'a str,
    pub price: f64,
    pub intermediate_stations: &'a [String],
    pub notes: Option<&'a str>,
    pub images: Vec<ImageLink>,
}

/// Accepts contributions: uploads their photos, then emails a summary.
///
/// Each integration is optional so the server can run without them; a
/// submission that needs a missing one fails with `NotConfigured`.
pub struct ContributionDesk<H, N> {
    host: Option<H>,
    notifier: Option<N>,
    admin_email: Option<String>,
}

impl<H: ImageHost, N: Notifier> ContributionDesk<H, N> {
    pub fn new(host: Option<H>, notifier: Option<N>, admin_email: Option<String>) -> Self {
        Self {
            host,
            notifier,
            admin_email: admin_email.filter(|e| !e.trim().is_empty()),
        }
    }

    pub async fn submit(&self, form: &ContributionForm) -> Result<(), ContributionError> {
        let admin_email = self
            .admin_email
            .as_deref()
            .ok_or(ContributionError::NotConfigured("Admin email"))?;
        let notifier = self
            .notifier
            .as_ref()
            .ok_or(ContributionError::NotConfigured("Email service"))?;

        let mut images = Vec::with_capacity(form.images.len());
        if !form.images.is_empty() {
            let host = self
                .host
                .as_ref()
                .ok_or(ContributionError::NotConfigured("Image hosting"))?;
            for image in &form.images {
                let url = host.upload(image).await?;
                images.push(ImageLink {
                    label: capitalize(&image.slot.to_string()),
                    url,
                });
            }
        }

        let body = ContributionEmail {
            start_station: &form.start_station,
            end_station: &form.end_station,
            price: form.price,
            intermediate_stations: &form.intermediate_stations,
            notes: form.notes.as_deref(),
            images,
        };
        let html = body
            .render()
            .map_err(|e| ContributionError::Notify(e.to_string()))?;

        let email = Email {
            from: SENDER.to_string(),
            to: vec![admin_email.to_string()],
            subject: format!(
                "New Route Contribution: {} to {}",
                form.start_station, form.end_station
            ),
            html,
        };
        notifier.send(&email).await?;

        info!(
            start = %form.start_station,
            end = %form.end_station,
            images = form.images.len(),
            "contribution forwarded"
        );
        Ok(())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contribution::{ImageSlot, ImageUpload};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeHost {
        uploads: Mutex<Vec<String>>,
        fail: bool,
    }

    impl ImageHost for FakeHost {
        async fn upload(&self, image: &ImageUpload) -> Result<String, ContributionError> {
            if self.fail {
                return Err(ContributionError::Upload {
                    slot: image.slot.to_string(),
                    message: "quota exceeded".into(),
                });
            }
            self.uploads.lock().unwrap().push(image.file_name.clone());
            Ok(format!("https://img.example/{}", image.file_name))
        }
    }

    #[derive(Default)]
    struct FakeNotifier {
        sent: Mutex<Vec<Email>>,
    }

    impl Notifier for FakeNotifier {
        async fn send(&self, email: &Email) -> Result<(), ContributionError> {
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    fn form() -> ContributionForm {
        ContributionForm {
            start_station: "Bole".into(),
            end_station: "Piassa".into(),
            price: 25.0,
            intermediate_stations: vec!["Meskel".into()],
            notes: Some("Take the <blue> taxi & ask".into()),
            images: Vec::new(),
        }
    }

    fn image(slot: ImageSlot, name: &str) -> ImageUpload {
        ImageUpload {
            slot,
            file_name: name.into(),
            content_type: None,
            bytes: vec![1, 2, 3],
        }
    }

    fn desk(
        host: Option<FakeHost>,
        admin: Option<&str>,
    ) -> ContributionDesk<FakeHost, FakeNotifier> {
        ContributionDesk::new(
            host,
            Some(FakeNotifier::default()),
            admin.map(str::to_string),
        )
    }

    fn sent(desk: &ContributionDesk<FakeHost, FakeNotifier>) -> Vec<Email> {
        desk.notifier.as_ref().unwrap().sent.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn emails_admin_with_escaped_summary() {
        let desk = desk(None, Some("admin@example.com"));
        desk.submit(&form()).await.unwrap();

        let sent = sent(&desk);
        assert_eq!(sent.len(), 1);
        let email = &sent[0];
        assert_eq!(email.to, vec!["admin@example.com"]);
        assert_eq!(email.from, SENDER);
        assert_eq!(email.subject, "New Route Contribution: Bole to Piassa");
        assert!(email.html.contains("<h2>New Route Contribution</h2>"));
        assert!(email.html.contains("25 Birr"));
        assert!(email.html.contains("<li>Meskel</li>"));
        assert!(email.html.contains("&lt;blue&gt;"));
        assert!(!email.html.contains("<blue>"));
        assert!(!email.html.contains("Images:"));
    }

    #[tokio::test]
    async fn uploads_images_before_sending() {
        let desk = desk(Some(FakeHost::default()), Some("admin@example.com"));
        let mut form = form();
        form.images = vec![
            image(ImageSlot::Start, "start.jpg"),
            image(ImageSlot::Intermediate("1".into()), "mid.jpg"),
        ];
        desk.submit(&form).await.unwrap();

        let uploads = desk.host.as_ref().unwrap().uploads.lock().unwrap().clone();
        assert_eq!(uploads, vec!["start.jpg", "mid.jpg"]);

        let html = &sent(&desk)[0].html;
        assert!(html.contains("Start station image"));
        assert!(html.contains("https://img.example/mid.jpg"));
    }

    #[tokio::test]
    async fn missing_admin_email_is_not_configured() {
        let desk = desk(None, Some("  "));
        let err = desk.submit(&form()).await.unwrap_err();
        assert_eq!(err.to_string(), "Admin email not configured");
        assert!(sent(&desk).is_empty());
    }

    #[tokio::test]
    async fn images_without_host_are_not_configured() {
        let desk = desk(None, Some("admin@example.com"));
        let mut form = form();
        form.images = vec![image(ImageSlot::End, "end.jpg")];
        let err = desk.submit(&form).await.unwrap_err();
        assert!(matches!(err, ContributionError::NotConfigured("Image hosting")));
    }

    #[tokio::test]
    async fn failed_upload_sends_nothing() {
        let host = FakeHost {
            fail: true,
            ..FakeHost::default()
        };
        let desk = desk(Some(host), Some("admin@example.com"));
        let mut form = form();
        form.images = vec![image(ImageSlot::End, "end.jpg")];
        let err = desk.submit(&form).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to upload end station image: quota exceeded"
        );
        assert!(sent(&desk).is_empty());
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("end station image"), "End station image");
        assert_eq!(capitalize(""), "");
    }
}
