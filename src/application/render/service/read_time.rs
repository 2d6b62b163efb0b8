use std::num::NonZeroU32;

use crate::domain::document::{ContentSection, RichTextBlock};

/// Plain text of a body: block texts joined by a single space.
pub(crate) fn body_text(body: &[RichTextBlock]) -> String {
    body.iter()
        .map(RichTextBlock::text)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Heading characters plus whitespace-delimited body tokens.
pub fn section_word_count(section: &ContentSection) -> usize {
    let heading = section.heading.chars().count();
    let body = body_text(&section.body).split_whitespace().count();
    heading + body
}

pub fn count_words(sections: &[ContentSection]) -> usize {
    sections.iter().map(section_word_count).sum()
}

/// Minutes to read `sections`, rounded up. No content reads in zero minutes.
pub fn estimate_read_time(sections: &[ContentSection], words_per_minute: NonZeroU32) -> u32 {
    minutes_for(count_words(sections), words_per_minute)
}

pub(crate) fn minutes_for(words: usize, words_per_minute: NonZeroU32) -> u32 {
    let per_minute = words_per_minute.get() as usize;
    u32::try_from(words.div_ceil(per_minute)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wpm(value: u32) -> NonZeroU32 {
        NonZeroU32::new(value).unwrap()
    }

    fn words(count: usize) -> String {
        vec!["lorem"; count].join(" ")
    }

    #[test]
    fn ceiling_boundaries() {
        assert_eq!(minutes_for(0, wpm(200)), 0);
        assert_eq!(minutes_for(1, wpm(200)), 1);
        assert_eq!(minutes_for(200, wpm(200)), 1);
        assert_eq!(minutes_for(201, wpm(200)), 2);
    }

    #[test]
    fn heading_counts_characters_and_body_counts_tokens() {
        let section = ContentSection::new(
            "Intro",
            vec![
                RichTextBlock::paragraph("one two\nthree"),
                RichTextBlock::paragraph("  four   "),
            ],
        );
        assert_eq!(section_word_count(&section), 5 + 4);
    }

    #[test]
    fn empty_body_contributes_nothing() {
        let section = ContentSection::new("", Vec::new());
        assert_eq!(section_word_count(&section), 0);
        assert_eq!(estimate_read_time(&[section], wpm(200)), 0);
    }

    #[test]
    fn empty_document_reads_in_zero_minutes() {
        assert_eq!(count_words(&[]), 0);
        assert_eq!(estimate_read_time(&[], wpm(200)), 0);
    }

    #[test]
    fn exact_multiple_of_reading_speed() {
        let sections = vec![ContentSection::new(
            "",
            vec![RichTextBlock::paragraph(words(200))],
        )];
        assert_eq!(estimate_read_time(&sections, wpm(200)), 1);

        let sections = vec![ContentSection::new(
            "a",
            vec![RichTextBlock::paragraph(words(200))],
        )];
        assert_eq!(estimate_read_time(&sections, wpm(200)), 2);
    }

    #[test]
    fn reading_speed_is_configurable() {
        let sections = vec![ContentSection::new(
            "",
            vec![RichTextBlock::paragraph(words(250))],
        )];
        assert_eq!(estimate_read_time(&sections, wpm(100)), 3);
        assert_eq!(estimate_read_time(&sections, wpm(250)), 1);
    }

    #[test]
    fn image_blocks_add_no_words() {
        let sections = vec![ContentSection::new(
            "",
            vec![
                RichTextBlock::paragraph("one"),
                RichTextBlock::Unknown,
                RichTextBlock::paragraph("two"),
            ],
        )];
        assert_eq!(count_words(&sections), 2);
    }
}
