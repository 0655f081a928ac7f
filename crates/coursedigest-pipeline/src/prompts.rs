use coursedigest_sources::types::truncate_chars;
use coursedigest_sources::Thread;
use std::fmt::Write;

pub const MAIN_SUMMARY_INSTRUCTIONS: &str = "Please write a structured summary of what students say about this course, with:
- Overall sentiment
- Difficulty and workload
- Student advice
- Professor mentions
- Estimated A chance (e.g., \"Estimated A Chance: 70%\")
- Tags (e.g., \"Tags: 🔥 Hard, 👨‍🏫 Great prof\")

Respond naturally but include those elements. Keep it concise.";

const MAIN_BODY_CHARS: usize = 300;
const MAIN_COMMENT_CHARS: usize = 100;
const SELECT_EXCERPT_CHARS: usize = 200;
const BATCH_BODY_CHARS: usize = 500;
const BATCH_COMMENT_CHARS: usize = 200;

/// Overall summary over a handful of threads
pub fn build_main_prompt(query: &str, threads: &[Thread]) -> String {
    let mut prompt = format!("Course: {}\n\n{}\n", query, MAIN_SUMMARY_INSTRUCTIONS);

    for thread in threads {
        let _ = write!(
            prompt,
            "\n- Title: {}\n  Body: {}\n",
            thread.title,
            thread.body_excerpt(MAIN_BODY_CHARS)
        );
        if let Some(comment) = thread.comments.first() {
            let _ = writeln!(prompt, "  Comment: {}", truncate_chars(comment, MAIN_COMMENT_CHARS));
        }
    }

    prompt
}

/// Index-labelled excerpts for the relevance selector
pub fn build_selection_prompt(query: &str, threads: &[Thread], count: usize) -> String {
    let mut prompt = format!(
        "A student is researching the university course \"{}\".\n\
         Below are Reddit posts, each labelled with an index in square brackets.\n\
         Choose the {} posts most relevant to the course's difficulty, workload, grading and instructors.\n\n",
        query, count
    );

    for (idx, thread) in threads.iter().enumerate() {
        let _ = writeln!(prompt, "[{}] {}", idx, thread.title);
        let excerpt = thread.body_excerpt(SELECT_EXCERPT_CHARS).replace('\n', " ");
        if !excerpt.trim().is_empty() {
            let _ = writeln!(prompt, "    {}", excerpt);
        }
    }

    let _ = write!(
        prompt,
        "\nRespond with ONLY the indices of the selected posts, separated by commas (for example: 0, 3, 5)."
    );
    prompt
}

/// One prompt for a whole batch, asking for `POST n:` sections
pub fn build_batch_prompt(query: &str, threads: &[Thread]) -> String {
    let mut prompt = format!(
        "Summarize each of the following Reddit posts about the course \"{}\". \
         Highlight advice, experience, or consensus about the course in 2-3 sentences per post.\n\n",
        query
    );

    for (idx, thread) in threads.iter().enumerate() {
        let _ = write!(
            prompt,
            "POST {}:\nTitle: {}\nBody: {}\n",
            idx + 1,
            thread.title,
            thread.body_excerpt(BATCH_BODY_CHARS)
        );
        if !thread.comments.is_empty() {
            prompt.push_str("Top comments:\n");
            for (n, comment) in thread.comments.iter().enumerate() {
                let _ = writeln!(prompt, "{}. {}", n + 1, truncate_chars(comment, BATCH_COMMENT_CHARS));
            }
        }
        prompt.push('\n');
    }

    let markers = (1..=threads.len())
        .map(|n| format!("POST {}: <summary>", n))
        .collect::<Vec<_>>()
        .join("\n");
    let _ = write!(
        prompt,
        "Respond in exactly this format, one section per post and nothing else:\n{}",
        markers
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thread(n: usize) -> Thread {
        Thread::new(
            format!("https://reddit.com/r/UWMadison/comments/{}", n),
            format!("Title {}", n),
            "x".repeat(1000),
            vec![format!("comment {}", n), "second".to_string()],
        )
    }

    #[test]
    fn test_main_prompt_truncates() {
        let prompt = build_main_prompt("CS577", &[thread(1)]);
        assert!(prompt.contains("Course: CS577"));
        assert!(prompt.contains("Estimated A Chance"));
        assert!(prompt.contains(&format!("Body: {}\n", "x".repeat(300))));
        assert!(!prompt.contains(&"x".repeat(301)));
        assert!(prompt.contains("Comment: comment 1"));
        assert!(!prompt.contains("second"));
    }

    #[test]
    fn test_selection_prompt_labels_indices() {
        let prompt = build_selection_prompt("CS577", &[thread(1), thread(2)], 1);
        assert!(prompt.contains("[0] Title 1"));
        assert!(prompt.contains("[1] Title 2"));
        assert!(prompt.contains("ONLY the indices"));
    }

    #[test]
    fn test_batch_prompt_markers() {
        let prompt = build_batch_prompt("CS577", &[thread(1), thread(2), thread(3)]);
        assert!(prompt.contains("POST 1:\nTitle: Title 1"));
        assert!(prompt.contains("POST 3:\nTitle: Title 3"));
        assert!(prompt.ends_with("POST 1: <summary>\nPOST 2: <summary>\nPOST 3: <summary>"));
    }
}
