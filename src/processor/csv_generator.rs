use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use csv::Writer;

use crate::config::OutputConfig;
use crate::error::AppError;
use crate::scraping::Review;

/// Byte-order mark prefixed to the file; Excel will not decode the Korean
/// review text as UTF-8 without it.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

pub struct CsvGenerator {
    output_path: PathBuf,
}

impl CsvGenerator {
    pub fn new(config: OutputConfig) -> Self {
        Self {
            output_path: config.path,
        }
    }

    pub fn generate(&self, reviews: &[Review]) -> Result<(), AppError> {
        let mut file = File::create(&self.output_path)?;
        file.write_all(UTF8_BOM)?;
        write_rows(file, reviews)
    }
}

fn write_rows<W: Write>(writer: W, reviews: &[Review]) -> Result<(), AppError> {
    let mut wtr = Writer::from_writer(writer);

    wtr.write_record([
        "nickname",
        "date",
        "rating",
        "option",
        "auto_label",
        "content",
        "image_count",
    ])?;

    for review in reviews {
        let image_count = review.image_count.to_string();
        wtr.write_record([
            review.nickname.as_str(),
            review.date.as_str(),
            review.rating.as_str(),
            review.option.as_str(),
            review.auto_label.as_str(),
            review.content.as_str(),
            image_count.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_carry_every_field_in_header_order() {
        let reviews = vec![Review {
            nickname: "김**".to_string(),
            date: "25.07.01.".to_string(),
            rating: "5".to_string(),
            option: "색상: 레드".to_string(),
            auto_label: "구매자 A | 한달사용 리뷰".to_string(),
            content: "정말 좋아요".to_string(),
            image_count: 3,
        }];

        let mut buf = Vec::new();
        write_rows(&mut buf, &reviews).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "nickname,date,rating,option,auto_label,content,image_count"
        );
        assert_eq!(
            lines.next().unwrap(),
            "김**,25.07.01.,5,색상: 레드,구매자 A | 한달사용 리뷰,정말 좋아요,3"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn empty_result_still_writes_the_header() {
        let mut buf = Vec::new();
        write_rows(&mut buf, &[]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
