use once_cell::sync::Lazy;
use regex::Regex;

// Label may hold one level of brackets, target one level of parentheses,
// optionally followed by a quoted title.
static MARKDOWN_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"\[((?:[^\[\]]|\[[^\[\]]*\])*)\]\((?:[^()\s]|\([^()\s]*\))*(?:\s+"[^"]*")?\)"#
    ).expect("markdown link pattern is valid")
});

/// Rewrites every markdown link `[text](target)` to its bare `text`.
///
/// Runs until nothing matches, so nested or adjacent links that only become
/// links after an inner rewrite are removed too and the result is stable.
pub fn strip_links(text: &str) -> String {
    let mut out = text.to_string();
    while MARKDOWN_LINK.is_match(&out) {
        out = MARKDOWN_LINK.replace_all(&out, "${1}").into_owned();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_url_and_keeps_label() {
        let out = strip_links("According to [source](http://example.com), Arsenal won.");
        assert_eq!(out, "According to source, Arsenal won.");
        assert!(!out.contains("http://example.com"));
    }

    #[test]
    fn handles_several_links() {
        let out = strip_links("[BBC](https://bbc.co.uk/sport) and [ESPN](https://espn.com) agree");
        assert_eq!(out, "BBC and ESPN agree");
    }

    #[test]
    fn nested_link_collapses_fully() {
        assert_eq!(strip_links("[[x](http://a)](http://b)"), "x");
    }

    #[test]
    fn urls_with_parens_brackets_or_titles_are_removed() {
        let cases = [
            (
                "See [Bukayo Saka](https://en.wikipedia.org/wiki/Bukayo_Saka_(footballer)) for more.",
                "See Bukayo Saka for more.",
                "wikipedia.org",
            ),
            (
                "Per [Arsenal [official]](https://arsenal.com/news), Saka is fit.",
                "Per Arsenal [official], Saka is fit.",
                "arsenal.com",
            ),
            (
                "Per [BBC](https://bbc.co.uk \"BBC Sport\"), the derby is on.",
                "Per BBC, the derby is on.",
                "bbc.co.uk",
            ),
        ];
        for (input, expected, host) in cases {
            let out = strip_links(input);
            assert_eq!(out, expected);
            assert!(!out.contains(host), "{}", out);
        }
    }

    #[test]
    fn plain_brackets_are_untouched() {
        let text = "Top scorers [2024] (provisional) and [note](see page 4)";
        assert_eq!(strip_links(text), text);
    }

    #[test]
    fn stripping_is_idempotent() {
        let samples = [
            "no links here",
            "[a](http://x) [b](https://y/z?q=1)",
            "[[x](http://a)](http://b)",
            "[](http://empty.label)",
            "[one](http://1)[two](http://2)",
            "broken [link](http://x and more",
            "See [Bukayo Saka](https://en.wikipedia.org/wiki/Bukayo_Saka_(footballer)) for more.",
            "Per [Arsenal [official]](https://arsenal.com/news), Saka is fit.",
            "Per [BBC](https://bbc.co.uk \"BBC Sport\"), the derby is on.",
        ];
        for sample in samples {
            let once = strip_links(sample);
            assert_eq!(strip_links(&once), once, "{}", sample);
        }
    }
}
