//! Collecting a contribution from multipart form fields.

use std::collections::BTreeMap;
use std::fmt;

use super::error::ContributionError;

const START_STATION: &str = "startStation";
const END_STATION: &str = "endStation";
const PRICE: &str = "price";
const NOTES: &str = "notes";
const START_IMAGE: &str = "startStationImage";
const END_IMAGE: &str = "endStationImage";
const INTERMEDIATE_STATION: &str = "intermediateStation";
const INTERMEDIATE_IMAGE: &str = "intermediateStationImage";

/// Which station a photo shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSlot {
    Start,
    End,
    /// Keyed by the suffix of the form field, e.g. `"2"` for
    /// `intermediateStationImage2`.
    Intermediate(String),
}

impl fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSlot::Start => write!(f, "start station image"),
            ImageSlot::End => write!(f, "end station image"),
            ImageSlot::Intermediate(key) => write!(f, "intermediate station image {key}"),
        }
    }
}

/// An uploaded photo held in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub slot: ImageSlot,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("slot", &self.slot)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A validated contribution.
#[derive(Debug, Clone, PartialEq)]
pub struct ContributionForm {
    pub start_station: String,
    pub end_station: String,
    pub price: f64,
    /// In field order
    pub intermediate_stations: Vec<String>,
    pub notes: Option<String>,
    /// Start, end, then intermediates in field order
    pub images: Vec<ImageUpload>,
}

/// Order `intermediateStation2` before `intermediateStation10`.
fn field_order(suffix: &str) -> (Option<u32>, String) {
    (suffix.parse().ok(), suffix.to_string())
}

/// Accumulates form fields as they stream in.
#[derive(Debug, Default)]
pub struct ContributionFormBuilder {
    start_station: Option<String>,
    end_station: Option<String>,
    price: Option<String>,
    notes: Option<String>,
    intermediates: BTreeMap<(Option<u32>, String), String>,
    start_image: Option<ImageUpload>,
    end_image: Option<ImageUpload>,
    intermediate_images: BTreeMap<(Option<u32>, String), ImageUpload>,
}

impl ContributionFormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a text field. Unknown fields are ignored.
    pub fn text(&mut self, name: &str, value: String) {
        match name {
            START_STATION => self.start_station = Some(value),
            END_STATION => self.end_station = Some(value),
            PRICE => self.price = Some(value),
            NOTES => self.notes = Some(value),
            _ if name.starts_with(INTERMEDIATE_IMAGE) => {}
            _ => {
                if let Some(suffix) = name.strip_prefix(INTERMEDIATE_STATION) {
                    self.intermediates.insert(field_order(suffix), value);
                }
            }
        }
    }

    /// Record a file field. Empty files and unknown fields are ignored.
    pub fn file(
        &mut self,
        name: &str,
        file_name: String,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) {
        if bytes.is_empty() {
            return;
        }
        let upload = |slot| ImageUpload {
            slot,
            file_name,
            content_type,
            bytes,
        };
        match name {
            START_IMAGE => self.start_image = Some(upload(ImageSlot::Start)),
            END_IMAGE => self.end_image = Some(upload(ImageSlot::End)),
            _ => {
                if let Some(suffix) = name.strip_prefix(INTERMEDIATE_IMAGE) {
                    self.intermediate_images.insert(
                        field_order(suffix),
                        upload(ImageSlot::Intermediate(suffix.to_string())),
                    );
                }
            }
        }
    }

    /// Check required fields and produce the form.
    pub fn finish(self) -> Result<ContributionForm, ContributionError> {
        let start_station = required(self.start_station, START_STATION)?;
        let end_station = required(self.end_station, END_STATION)?;
        let price = required(self.price, PRICE)?;
        let price: f64 = price
            .parse()
            .map_err(|_| ContributionError::InvalidPrice)?;
        if !price.is_finite() || price <= 0.0 {
            return Err(ContributionError::InvalidPrice);
        }

        let intermediate_stations = self
            .intermediates
            .into_values()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let images = self
            .start_image
            .into_iter()
            .chain(self.end_image)
            .chain(self.intermediate_images.into_values())
            .collect();

        Ok(ContributionForm {
            start_station,
            end_station,
            price,
            intermediate_stations,
            notes: self
                .notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            images,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ContributionError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ContributionError::MissingField(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> ContributionFormBuilder {
        let mut b = ContributionFormBuilder::new();
        b.text("startStation", "Bole".into());
        b.text("endStation", "Piassa".into());
        b.text("price", "25".into());
        b
    }

    #[test]
    fn minimal_form() {
        let form = builder().finish().unwrap();
        assert_eq!(form.start_station, "Bole");
        assert_eq!(form.end_station, "Piassa");
        assert_eq!(form.price, 25.0);
        assert!(form.intermediate_stations.is_empty());
        assert!(form.notes.is_none());
        assert!(form.images.is_empty());
    }

    #[test]
    fn missing_fields_are_rejected() {
        let mut b = ContributionFormBuilder::new();
        b.text("startStation", "Bole".into());
        b.text("price", "25".into());
        assert!(matches!(
            b.finish(),
            Err(ContributionError::MissingField("endStation"))
        ));

        let mut b = builder();
        b.text("price", "   ".into());
        assert!(matches!(
            b.finish(),
            Err(ContributionError::MissingField("price"))
        ));
    }

    #[test]
    fn price_must_be_positive_number() {
        for bad in ["abc", "0", "-5", "NaN", "inf"] {
            let mut b = builder();
            b.text("price", bad.into());
            assert!(
                matches!(b.finish(), Err(ContributionError::InvalidPrice)),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn intermediates_follow_field_number() {
        let mut b = builder();
        b.text("intermediateStation10", "Mexico".into());
        b.text("intermediateStation2", "Meskel".into());
        b.text("intermediateStation1", "Urael".into());
        b.text("intermediateStation3", "  ".into());
        let form = b.finish().unwrap();
        assert_eq!(form.intermediate_stations, vec!["Urael", "Meskel", "Mexico"]);
    }

    #[test]
    fn images_are_ordered_and_empty_files_skipped() {
        let mut b = builder();
        b.file(
            "intermediateStationImage2",
            "b.jpg".into(),
            None,
            vec![2],
        );
        b.file("endStationImage", "end.jpg".into(), None, vec![1]);
        b.file(
            "intermediateStationImage1",
            "a.jpg".into(),
            Some("image/jpeg".into()),
            vec![3],
        );
        b.file("startStationImage", "empty.jpg".into(), None, Vec::new());

        let form = b.finish().unwrap();
        let slots: Vec<_> = form.images.iter().map(|i| i.slot.clone()).collect();
        assert_eq!(
            slots,
            vec![
                ImageSlot::End,
                ImageSlot::Intermediate("1".into()),
                ImageSlot::Intermediate("2".into()),
            ]
        );
    }

    #[test]
    fn image_field_text_is_not_a_station() {
        let mut b = builder();
        b.text("intermediateStationImage1", "oops".into());
        let form = b.finish().unwrap();
        assert!(form.intermediate_stations.is_empty());
    }

    #[test]
    fn slot_labels() {
        assert_eq!(ImageSlot::Start.to_string(), "start station image");
        assert_eq!(
            ImageSlot::Intermediate("3".into()).to_string(),
            "intermediate station image 3"
        );
    }
}
