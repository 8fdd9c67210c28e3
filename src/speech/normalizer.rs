//! Punctuation pacing for naive synthesis engines.
//!
//! Naive engines run unpunctuated technical text together; inserting
//! textual pause markers is a cheaper and more reliable pacing mechanism
//! for batch automation than structured speech markup. The passes run in
//! a fixed order and each consumes the previous pass's output.

use regex::Regex;

/// The pause marker inserted between spoken fragments
pub const PAUSE: &str = "，";

/// Lifecycle identifiers that get a pause appended after each occurrence
const LIFECYCLE_TOKENS: [&str; 12] = [
    "beforeCreate",
    "created",
    "beforeMount",
    "mounted",
    "beforeUpdate",
    "updated",
    "beforeDestroy",
    "destroyed",
    "beforeUnmount",
    "unmounted",
    "activated",
    "deactivated",
];

/// Transforms cleaned plain text into punctuation-paced speech text.
#[derive(Debug, Clone)]
pub struct SpeechNormalizer {
    fenced_code: Regex,
    inline_code: Regex,
    list_marker: Regex,
    ordered_marker: Regex,
    md_symbols: Regex,
    lifecycle: Regex,
    token_triple: Regex,
    camel_case: Regex,
    repeated_pause: Regex,
    spaced_pause: Regex,
    trailing_pause: Regex,
    disallowed: Regex,
    whitespace: Regex,
}

impl Default for SpeechNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechNormalizer {
    /// Compile the transformation patterns
    pub fn new() -> Self {
        let lifecycle = format!(r"\b({})\b", LIFECYCLE_TOKENS.join("|"));
        Self {
            fenced_code: Regex::new(r"```[^`]*```").unwrap(),
            inline_code: Regex::new(r"`[^`]+`").unwrap(),
            list_marker: Regex::new(r"(?m)^\s*[-*+]\s+").unwrap(),
            ordered_marker: Regex::new(r"(?m)^\s*\d+\.\s+").unwrap(),
            md_symbols: Regex::new(r"[#*_~`]").unwrap(),
            lifecycle: Regex::new(&lifecycle).unwrap(),
            token_triple: Regex::new(r"(\w+)\s+(\w+)\s+(\w+)").unwrap(),
            camel_case: Regex::new(r"([a-z])([A-Z])").unwrap(),
            repeated_pause: Regex::new(r"，+").unwrap(),
            spaced_pause: Regex::new(r"，\s*，").unwrap(),
            trailing_pause: Regex::new(r"，\s*$").unwrap(),
            disallowed: Regex::new(r"[^\w\s\x{4E00}-\x{9FFF}，。！？；：]").unwrap(),
            whitespace: Regex::new(r"\s+").unwrap(),
        }
    }

    /// Run the full pacing pipeline over one cleaned span
    pub fn normalize(&self, text: &str) -> String {
        // code never survives into speech
        let text = self.fenced_code.replace_all(text, "");
        let text = self.inline_code.replace_all(&text, "");

        // list markers and leftover markdown symbols
        let text = self.list_marker.replace_all(&text, "");
        let text = self.ordered_marker.replace_all(&text, "");
        let text = self.md_symbols.replace_all(&text, "");

        // arrows become spoken transitions
        let text = text
            .replace('→', "，然后")
            .replace('←', "，返回")
            .replace('↑', "，向上")
            .replace('↓', "，向下");

        // pause after lifecycle identifiers
        let text = self.lifecycle.replace_all(&text, "${1}，");

        // pause between groups of three whitespace-separated tokens
        let text = self.token_triple.replace_all(&text, "${1}，${2}，${3}");

        // pauses around brackets and operators, open/close named distinctly
        let text = text
            .replace('(', "，开括号，")
            .replace(')', "，闭括号，")
            .replace('[', "，开方括号，")
            .replace(']', "，闭方括号，")
            .replace('{', "，开花括号，")
            .replace('}', "，闭花括号，")
            .replace('=', "，等于，")
            .replace('+', "，加，")
            .replace('*', "，乘，")
            .replace('/', "，除，");

        // pause at camelCase boundaries and at every dot
        let text = self.camel_case.replace_all(&text, "${1}，${2}");
        let text = text.replace('.', "，点，");

        // collapse runs of pauses, terminate a trailing pause
        let text = self.repeated_pause.replace_all(&text, PAUSE);
        let text = self.spaced_pause.replace_all(&text, PAUSE);
        let text = self.trailing_pause.replace_all(&text, "。");

        // keep word characters, whitespace, ideographs and the pause
        // punctuation set; everything else becomes a space
        let text = self.disallowed.replace_all(&text, " ");
        let text = self.whitespace.replace_all(&text, " ");
        text.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_removed() {
        let n = SpeechNormalizer::new();
        assert_eq!(n.normalize("前置 ```js\nlet x = 1\n``` 后置"), "前置 后置");
        assert_eq!(n.normalize("调用 `ref()` 即可"), "调用 即可");
    }

    #[test]
    fn test_list_markers_are_stripped() {
        let n = SpeechNormalizer::new();
        assert_eq!(n.normalize("- 第一项"), "第一项");
        assert_eq!(n.normalize("1. 第一步"), "第一步");
    }

    #[test]
    fn test_arrows_become_transitions() {
        let n = SpeechNormalizer::new();
        assert_eq!(n.normalize("挂载 → 更新"), "挂载 ，然后 更新");
        assert_eq!(n.normalize("回退 ← 上一步"), "回退 ，返回 上一步");
    }

    #[test]
    fn test_lifecycle_tokens_get_a_pause() {
        let n = SpeechNormalizer::new();
        let out = n.normalize("先触发 mounted 钩子");
        assert!(out.contains("mounted，"), "got: {out}");
    }

    #[test]
    fn test_lifecycle_token_inside_longer_word_is_untouched() {
        let n = SpeechNormalizer::new();
        // "deactivated" contains "activated" but the word boundary protects it
        let out = n.normalize("deactivated 之后");
        assert!(out.contains("deactivated，"), "got: {out}");
        assert!(!out.contains("deactivated，，"), "got: {out}");
    }

    #[test]
    fn test_token_triples_are_paused() {
        let n = SpeechNormalizer::new();
        assert_eq!(n.normalize("aaa bbb ccc"), "aaa，bbb，ccc");
    }

    #[test]
    fn test_brackets_and_operators_are_spoken() {
        let n = SpeechNormalizer::new();
        let out = n.normalize("x = (1)");
        assert!(out.contains("等于"), "got: {out}");
        assert!(out.contains("开括号"), "got: {out}");
        assert!(out.contains("闭括号"), "got: {out}");
    }

    #[test]
    fn test_camel_case_and_dots_are_paused() {
        let n = SpeechNormalizer::new();
        let out = n.normalize("vm.someMethod");
        assert!(out.contains("vm，点，some，Method"), "got: {out}");
    }

    #[test]
    fn test_trailing_pause_becomes_terminator() {
        let n = SpeechNormalizer::new();
        assert_eq!(n.normalize("结束 mounted"), "结束 mounted。");
    }

    #[test]
    fn test_repeated_pauses_collapse() {
        let n = SpeechNormalizer::new();
        let out = n.normalize("mounted（）之后");
        assert!(!out.contains("，，"), "got: {out}");
    }

    #[test]
    fn test_final_filter_keeps_pause_punctuation() {
        let n = SpeechNormalizer::new();
        let out = n.normalize("完成了！真的？是的；好：嗯。");
        assert_eq!(out, "完成了！真的？是的；好：嗯。");
    }

    #[test]
    fn test_final_filter_replaces_foreign_symbols() {
        let n = SpeechNormalizer::new();
        assert_eq!(n.normalize("价格 ¥100 左右"), "价格 100 左右");
    }

    #[test]
    fn test_empty_input_stays_empty() {
        let n = SpeechNormalizer::new();
        assert_eq!(n.normalize(""), "");
        assert_eq!(n.normalize("   \n  "), "");
    }
}
