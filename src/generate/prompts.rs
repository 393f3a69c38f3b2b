//! Prompt templates and post-processing of model answers.
//!
//! Templates use `{description}` and `{title}` placeholders. Models are asked
//! to put their answer after an answer prefix, which is stripped from the
//! response along with any preamble before it.

use serde::{Deserialize, Serialize};

/// Language of the generated deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
}

impl Language {
    /// ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptConfig {
    pub title_prompt: String,
    pub text_prompt: String,
    pub image_prompt: String,
    pub background_prompt: String,
    /// Style suffixes for background prompts; one is picked per run
    pub background_styles: Vec<String>,
    /// Marker preceding the answer in model responses, matched case-insensitively
    pub answer_prefix: String,
}

impl PromptConfig {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::En => Self::english(),
            Language::Ru => Self::russian(),
        }
    }

    pub fn english() -> Self {
        Self {
            title_prompt: concat!(
                "You are preparing a presentation. Description: {description}\n",
                "Write a numbered list of 5 to 8 short slide titles. The first title is the ",
                "title of the whole presentation. Reply with the list only, one title per line, ",
                "each line starting with \"answer:\"."
            )
            .to_string(),
            text_prompt: concat!(
                "You are preparing a presentation. Description: {description}\n",
                "Write the text of the slide titled \"{title}\": two or three short sentences, ",
                "no more than 40 words. Start your reply with \"answer:\"."
            )
            .to_string(),
            image_prompt: concat!(
                "You are preparing a presentation. Description: {description}\n",
                "Describe in one sentence a picture illustrating the slide titled \"{title}\". ",
                "Mention only what is visible. Start your reply with \"answer:\"."
            )
            .to_string(),
            background_prompt: concat!(
                "You are preparing a presentation. Description: {description}\n",
                "Give three to five comma-separated keywords describing a calm background ",
                "picture for the slide titled \"{title}\". Reply with the keywords only."
            )
            .to_string(),
            background_styles: vec![
                "watercolor, soft pastel colors".to_string(),
                "minimalism, flat illustration".to_string(),
                "blurred photo, bokeh".to_string(),
                "low poly, muted tones".to_string(),
                "paper cut art, light background".to_string(),
            ],
            answer_prefix: "answer:".to_string(),
        }
    }

    pub fn russian() -> Self {
        Self {
            title_prompt: concat!(
                "Ты готовишь презентацию. Описание: {description}\n",
                "Напиши нумерованный список из 5-8 коротких заголовков слайдов. Первый заголовок ",
                "является названием всей презентации. Ответь только списком, по одному заголовку ",
                "в строке, каждая строка начинается с \"ответ:\"."
            )
            .to_string(),
            text_prompt: concat!(
                "Ты готовишь презентацию. Описание: {description}\n",
                "Напиши текст слайда с заголовком \"{title}\": два или три коротких предложения, ",
                "не более 40 слов. Начни ответ с \"ответ:\"."
            )
            .to_string(),
            image_prompt: concat!(
                "Ты готовишь презентацию. Описание: {description}\n",
                "Опиши одним предложением картинку для слайда с заголовком \"{title}\". ",
                "Упоминай только то, что видно на картинке. Начни ответ с \"ответ:\"."
            )
            .to_string(),
            background_prompt: concat!(
                "Ты готовишь презентацию. Описание: {description}\n",
                "Назови от трех до пяти ключевых слов через запятую, описывающих спокойный ",
                "фон для слайда с заголовком \"{title}\". Ответь только ключевыми словами."
            )
            .to_string(),
            background_styles: vec![
                "акварель, мягкие пастельные цвета".to_string(),
                "минимализм, плоская иллюстрация".to_string(),
                "размытое фото, боке".to_string(),
                "low poly, приглушенные тона".to_string(),
                "бумажная аппликация, светлый фон".to_string(),
            ],
            answer_prefix: "ответ:".to_string(),
        }
    }

    pub fn title_query(&self, description: &str) -> String {
        fill(&self.title_prompt, description, "")
    }

    pub fn text_query(&self, description: &str, title: &str) -> String {
        fill(&self.text_prompt, description, title)
    }

    pub fn image_query(&self, description: &str, title: &str) -> String {
        fill(&self.image_prompt, description, title)
    }

    pub fn background_query(&self, description: &str, title: &str) -> String {
        fill(&self.background_prompt, description, title)
    }

    /// Split a title-list response into clean titles.
    pub fn parse_titles(&self, response: &str) -> Vec<String> {
        parse_titles(response, &self.answer_prefix)
    }

    /// Body text or image description with the answer preamble removed.
    pub fn clean_answer(&self, response: &str) -> String {
        strip_answer(response, &self.answer_prefix)
    }
}

fn fill(template: &str, description: &str, title: &str) -> String {
    template
        .replace("{description}", description)
        .replace("{title}", title)
}

/// Byte range of the first case-insensitive occurrence of `needle`.
fn find_case_insensitive(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }
    for (start, _) in haystack.char_indices() {
        let mut rest = haystack[start..].char_indices();
        let mut end = start;
        let matched = needle.chars().all(|n| match rest.next() {
            Some((offset, h)) if h.to_lowercase().eq(n.to_lowercase()) => {
                end = start + offset + h.len_utf8();
                true
            },
            _ => false,
        });
        if matched {
            return Some((start, end));
        }
    }
    None
}

/// Drop everything up to and including the answer prefix.
fn after_prefix<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    find_case_insensitive(text, prefix).map(|(_, end)| &text[end..])
}

/// Remove a leading list enumerator such as `3. ` or `3) `.
fn strip_enumerator(line: &str) -> &str {
    let trimmed = line.trim_start();
    let digits = trimmed.len() - trimmed.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return trimmed;
    }
    let rest = &trimmed[digits..];
    match rest.strip_prefix(['.', ')']) {
        Some(after) if after.is_empty() || after.starts_with(char::is_whitespace) => {
            after.trim_start()
        },
        _ => trimmed,
    }
}

/// Split a title-list response into titles.
///
/// Blank lines are dropped, list enumerators and periods removed, the text up
/// to the answer prefix stripped, and titles that end up empty discarded.
pub fn parse_titles(response: &str, answer_prefix: &str) -> Vec<String> {
    response
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let line = strip_enumerator(line).replace('.', "");
            let title = after_prefix(&line, answer_prefix).unwrap_or(line.as_str());
            let title = title
                .trim()
                .trim_matches(|c: char| matches!(c, '"' | '«' | '»' | '*'))
                .trim();
            (!title.is_empty()).then(|| title.to_string())
        })
        .collect()
}

/// Remove the preamble before the answer prefix and join the answer onto one line.
///
/// Responses without the prefix are returned trimmed and otherwise untouched.
pub fn strip_answer(response: &str, answer_prefix: &str) -> String {
    match after_prefix(response, answer_prefix) {
        Some(answer) => answer
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        None => response.trim().to_string(),
    }
}

/// Background prompt from model keywords and the style of the run.
pub fn background_prompt(keywords: &str, style: &str) -> String {
    format!("{}, {}", keywords.trim(), style)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_titles_strips_enumerators_and_prefix() {
        let response = "1. Answer: Intro to bees.\n\n2) answer: Habitat\n3. ANSWER: Diet\n";
        assert_eq!(
            parse_titles(response, "answer:"),
            vec!["Intro to bees", "Habitat", "Diet"]
        );
    }

    #[test]
    fn test_parse_titles_without_prefix() {
        let response = "Bees\n  \nHabitat\n10. Diet of bees";
        assert_eq!(
            parse_titles(response, "answer:"),
            vec!["Bees", "Habitat", "Diet of bees"]
        );
    }

    #[test]
    fn test_parse_titles_drops_empty() {
        let response = "1. answer:\n2. ...\n3. \"Pollination\"";
        assert_eq!(parse_titles(response, "answer:"), vec!["Pollination"]);
    }

    #[test]
    fn test_parse_titles_russian_prefix() {
        let response = "1. Ответ: Пчёлы\n2. ответ: Среда обитания";
        assert_eq!(
            parse_titles(response, "ответ:"),
            vec!["Пчёлы", "Среда обитания"]
        );
    }

    #[test]
    fn test_enumerator_needs_separator() {
        assert_eq!(strip_enumerator("3. Bees"), "Bees");
        assert_eq!(strip_enumerator("3) Bees"), "Bees");
        assert_eq!(strip_enumerator("2024 in review"), "2024 in review");
        assert_eq!(strip_enumerator("3.5 billion bees"), "3.5 billion bees");
    }

    #[test]
    fn test_strip_answer() {
        assert_eq!(
            strip_answer("Sure! Answer: Bees live\nin hives.", "answer:"),
            "Bees live in hives."
        );
        assert_eq!(
            strip_answer("  Bees live\nin hives.  ", "answer:"),
            "Bees live\nin hives."
        );
    }

    #[test]
    fn test_background_prompt() {
        assert_eq!(
            background_prompt(" flowers, meadow \n", "watercolor"),
            "flowers, meadow, watercolor"
        );
    }

    #[test]
    fn test_queries_fill_placeholders() {
        let prompts = PromptConfig::english();
        let query = prompts.text_query("Intro to bees", "Habitat");
        assert!(query.contains("Intro to bees"));
        assert!(query.contains("\"Habitat\""));
        assert!(!query.contains('{'));
        assert!(!prompts.title_query("Intro to bees").contains("{description}"));
    }

    #[test]
    fn test_presets_have_styles() {
        for language in [Language::En, Language::Ru] {
            let prompts = PromptConfig::for_language(language);
            assert!(!prompts.background_styles.is_empty());
            assert!(!prompts.answer_prefix.is_empty());
        }
        assert_eq!(Language::Ru.code(), "ru");
    }
}
