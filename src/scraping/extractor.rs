use scraper::{ElementRef, Html, Selector};

use super::models::Review;

/// Field-extraction rule table: one named selector per record field, parsed
/// once and reused for every card. Swapping a markup version means touching
/// only the literals here; the extraction contract below stays put.
pub struct CardSelectors {
    pub card: Selector,
    nickname: Selector,
    date: Selector,
    rating: Selector,
    option_box: Selector,
    buyer_info: Selector,
    system_tag: Selector,
    content_box: Selector,
    content_span: Selector,
    image_box: Selector,
    count_badge: Selector,
    image: Selector,
}

impl CardSelectors {
    pub fn new() -> Self {
        // Selector literals are fixed at compile time.
        let parse = |css: &str| Selector::parse(css).unwrap();
        Self {
            card: parse(".IwcuBUIAKf"),
            nickname: parse(".Db9Dtnf7gY strong"),
            date: parse(".Db9Dtnf7gY span:nth-of-type(1)"),
            rating: parse("em.n6zq2yy0KA"),
            option_box: parse(".b_caIle8kC"),
            buyer_info: parse(".eWRrdDdSzW"),
            system_tag: parse(".h8uqAeqIe7"),
            content_box: parse(".KqJ8Qqw082"),
            content_span: parse("span"),
            image_box: parse(".s30AvhHfb0"),
            count_badge: parse(".lOzR1kO8jf"),
            image: parse("img"),
        }
    }
}

impl Default for CardSelectors {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a page snapshot and extracts every review card in document order.
pub fn extract_page(html: &str, selectors: &CardSelectors) -> Vec<Review> {
    let document = Html::parse_document(html);
    document
        .select(&selectors.card)
        .map(|card| extract_card(card, selectors))
        .collect()
}

/// Produces one total record from a single card fragment. Missing optional
/// sub-elements degrade to empty text or a zero count; this never fails.
pub fn extract_card(card: ElementRef<'_>, selectors: &CardSelectors) -> Review {
    let nickname = first_text(card, &selectors.nickname);
    let date = first_text(card, &selectors.date);
    let rating = first_text(card, &selectors.rating);

    // Multi-line option boxes exist; only the primary line is wanted.
    let option = card
        .select(&selectors.option_box)
        .next()
        .and_then(|el| stripped_segments(el).into_iter().next())
        .unwrap_or_default();

    let buyer_info = first_text(card, &selectors.buyer_info);
    let system_tag = first_text(card, &selectors.system_tag);
    let auto_label = join_label_parts(&buyer_info, &system_tag);

    let content = card
        .select(&selectors.content_box)
        .next()
        .map(|content_box| assemble_content(content_box, &selectors.content_span))
        .unwrap_or_default();

    let image_count = card
        .select(&selectors.image_box)
        .next()
        .map(|image_box| count_images(image_box, selectors))
        .unwrap_or(0);

    Review {
        nickname,
        date,
        rating,
        option,
        auto_label,
        content,
        image_count,
    }
}

/// Buyer metadata and the system tag joined by `" | "`; an empty side is
/// omitted entirely so no dangling separator can appear.
fn join_label_parts(buyer_info: &str, system_tag: &str) -> String {
    [buyer_info, system_tag]
        .iter()
        .filter(|part| !part.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" | ")
}

/// With two or more spans in the content box, all but the last are inline
/// tags prefixed to the body; with one, that span is the whole content.
fn assemble_content(content_box: ElementRef<'_>, span: &Selector) -> String {
    let spans: Vec<String> = content_box
        .select(span)
        .map(collapsed_text)
        .collect();
    match spans.len() {
        0 => String::new(),
        1 => spans.into_iter().next().unwrap_or_default(),
        _ => spans.join(" "),
    }
}

/// Three observable image states: a count badge (digits only are trusted),
/// images without a badge (exactly one, regardless of how many render), or
/// no image container at all (handled by the caller as zero).
fn count_images(image_box: ElementRef<'_>, selectors: &CardSelectors) -> u32 {
    if let Some(badge) = image_box.select(&selectors.count_badge).next() {
        let digits: String = collapsed_text(badge)
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        digits.parse().unwrap_or(0)
    } else if image_box.select(&selectors.image).next().is_some() {
        1
    } else {
        0
    }
}

fn first_text(card: ElementRef<'_>, selector: &Selector) -> String {
    card.select(selector)
        .next()
        .map(collapsed_text)
        .unwrap_or_default()
}

/// Whitespace-collapsed text content: each text node trimmed, empties
/// dropped, the rest joined by single spaces.
fn collapsed_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Stripped text segments in document order, one per non-blank text node.
fn stripped_segments(el: ElementRef<'_>) -> Vec<String> {
    el.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_one(card_html: &str) -> Review {
        let selectors = CardSelectors::new();
        let html = format!(r#"<ul><li class="IwcuBUIAKf">{card_html}</li></ul>"#);
        let mut reviews = extract_page(&html, &selectors);
        assert_eq!(reviews.len(), 1);
        reviews.remove(0)
    }

    #[test]
    fn full_card_extracts_every_field() {
        let review = extract_one(
            r#"
            <div class="Db9Dtnf7gY"><strong>mac***</strong><span>25.07.14.</span></div>
            <em class="n6zq2yy0KA">5</em>
            <div class="b_caIle8kC"><div>색상: 레드</div><div>사이즈: L</div></div>
            <div class="eWRrdDdSzW">구매자 A</div>
            <div class="h8uqAeqIe7">한달사용 리뷰</div>
            <div class="KqJ8Qqw082"><span>맛있어요</span><span>재구매</span><span>정말 좋아요</span></div>
            <div class="s30AvhHfb0"><span class="lOzR1kO8jf">3+장</span><img src="a.jpg"></div>
            "#,
        );

        assert_eq!(review.nickname, "mac***");
        assert_eq!(review.date, "25.07.14.");
        assert_eq!(review.rating, "5");
        assert_eq!(review.option, "색상: 레드");
        assert_eq!(review.auto_label, "구매자 A | 한달사용 리뷰");
        assert_eq!(review.content, "맛있어요 재구매 정말 좋아요");
        assert_eq!(review.image_count, 3);
    }

    #[test]
    fn empty_card_degrades_to_total_defaults() {
        let review = extract_one("<div>unrelated markup</div>");
        assert_eq!(review.nickname, "");
        assert_eq!(review.date, "");
        assert_eq!(review.rating, "");
        assert_eq!(review.option, "");
        assert_eq!(review.auto_label, "");
        assert_eq!(review.content, "");
        assert_eq!(review.image_count, 0);
    }

    #[test]
    fn option_keeps_only_the_first_line() {
        let review = extract_one(
            r#"<div class="b_caIle8kC"><div>색상: 레드</div><div>사이즈: L</div></div>"#,
        );
        assert_eq!(review.option, "색상: 레드");
    }

    #[test]
    fn auto_label_omits_empty_sides() {
        let review =
            extract_one(r#"<div class="eWRrdDdSzW">구매자 A</div><div class="h8uqAeqIe7"></div>"#);
        assert_eq!(review.auto_label, "구매자 A");

        let review =
            extract_one(r#"<div class="eWRrdDdSzW"></div><div class="h8uqAeqIe7">정기구독</div>"#);
        assert_eq!(review.auto_label, "정기구독");

        let review = extract_one(r#"<div class="eWRrdDdSzW"></div>"#);
        assert_eq!(review.auto_label, "");
    }

    #[test]
    fn single_span_content_is_used_verbatim() {
        let review = extract_one(r#"<div class="KqJ8Qqw082"><span>배송이 빨라요</span></div>"#);
        assert_eq!(review.content, "배송이 빨라요");
    }

    #[test]
    fn content_box_without_spans_is_empty() {
        let review = extract_one(r#"<div class="KqJ8Qqw082">bare text</div>"#);
        assert_eq!(review.content, "");
    }

    #[test]
    fn image_count_badge_digits_win_over_image_elements() {
        let review = extract_one(
            r#"<div class="s30AvhHfb0"><span class="lOzR1kO8jf">12장</span><img><img></div>"#,
        );
        assert_eq!(review.image_count, 12);
    }

    #[test]
    fn badge_without_digits_counts_zero() {
        let review =
            extract_one(r#"<div class="s30AvhHfb0"><span class="lOzR1kO8jf">더보기</span></div>"#);
        assert_eq!(review.image_count, 0);
    }

    #[test]
    fn images_without_badge_count_exactly_one() {
        let review = extract_one(r#"<div class="s30AvhHfb0"><img src="a.jpg"><img src="b.jpg"></div>"#);
        assert_eq!(review.image_count, 1);
    }

    #[test]
    fn missing_image_box_counts_zero() {
        let review = extract_one(r#"<div class="KqJ8Qqw082"><span>본문</span></div>"#);
        assert_eq!(review.image_count, 0);
    }

    #[test]
    fn rating_is_kept_as_raw_text() {
        let review = extract_one(r#"<em class="n6zq2yy0KA">5점</em>"#);
        assert_eq!(review.rating, "5점");
    }

    #[test]
    fn date_is_first_span_after_nickname() {
        let review = extract_one(
            r#"<div class="Db9Dtnf7gY"><strong>별***</strong><span>25.06.30.</span><span>신고</span></div>"#,
        );
        assert_eq!(review.nickname, "별***");
        assert_eq!(review.date, "25.06.30.");
    }
}
