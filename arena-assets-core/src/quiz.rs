//! QUESTION.TXT: the character creation quiz. Each question is a
//! description plus three choices, and each choice is tagged with the class
//! category it counts toward.

use serde::Serialize;

use crate::bytes;
use crate::{AssetError, Result};

pub const QUESTION_FILENAME: &str = "QUESTION.TXT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClassCategory {
    Mage,
    Thief,
    Warrior,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionChoice {
    pub text: String,
    pub category: ClassCategory,
}

#[derive(Debug, Clone, Serialize)]
pub struct CharacterQuestion {
    pub description: String,
    pub choices: [QuestionChoice; 3],
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Description,
    A,
    B,
    C,
}

pub fn parse_question_txt(data: &[u8]) -> Result<Vec<CharacterQuestion>> {
    let text = String::from_utf8_lossy(data);

    let mut questions = Vec::new();
    let mut mode = Mode::Description;
    let mut description = String::new();
    let mut a = String::new();
    let mut b = String::new();
    let mut c = String::new();

    for line in bytes::lines(&text) {
        let first = line.chars().next().ok_or_else(|| {
            AssetError::Format(format!("{}: empty line in question text", QUESTION_FILENAME))
        })?;

        if first.is_ascii_alphabetic() {
            // 'a'/'b'/'c' at line start switches mode without flushing;
            // any other letter belongs to whatever mode is current.
            match first {
                'a' => mode = Mode::A,
                'b' => mode = Mode::B,
                'c' => mode = Mode::C,
                _ => {}
            }
        } else if first.is_ascii_digit() {
            // A digit starts the next question's description. Flush the
            // previous question unless this is the first one.
            if mode != Mode::Description {
                questions.push(build_question(&description, &a, &b, &c)?);
                description.clear();
                a.clear();
                b.clear();
                c.clear();
            }

            mode = Mode::Description;
        }

        // Restore the newline the line splitter removed.
        let target = match mode {
            Mode::Description => &mut description,
            Mode::A => &mut a,
            Mode::B => &mut b,
            Mode::C => &mut c,
        };
        target.push_str(line);
        target.push('\n');
    }

    // The last question has no digit line after it to flush it.
    questions.push(build_question(&description, &a, &b, &c)?);

    Ok(questions)
}

fn build_question(
    description: &str,
    a: &str,
    b: &str,
    c: &str,
) -> Result<CharacterQuestion> {
    Ok(CharacterQuestion {
        description: description.to_string(),
        choices: [
            QuestionChoice {
                text: a.to_string(),
                category: choice_category(a)?,
            },
            QuestionChoice {
                text: b.to_string(),
                category: choice_category(b)?,
            },
            QuestionChoice {
                text: c.to_string(),
                category: choice_category(c)?,
            },
        ],
    })
}

// Each choice carries a "(5x)" marker whose tag character decides which
// class category the answer counts toward.
fn choice_category(choice: &str) -> Result<ClassCategory> {
    let marker = choice.find("(5").ok_or_else(|| {
        AssetError::Format(format!(
            "{}: choice has no category marker",
            QUESTION_FILENAME
        ))
    })?;

    let tag = choice.as_bytes().get(marker + 2).copied().ok_or_else(|| {
        AssetError::Format(format!(
            "{}: choice category marker is truncated",
            QUESTION_FILENAME
        ))
    })?;

    match tag {
        b'l' => Ok(ClassCategory::Mage),
        b'c' => Ok(ClassCategory::Thief),
        b'v' => Ok(ClassCategory::Warrior),
        other => Err(AssetError::Format(format!(
            "{}: bad class category tag '{}'",
            QUESTION_FILENAME,
            other as char
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_question(n: u8, tag_a: char, tag_b: char, tag_c: char) -> String {
        format!(
            "{}. Some scenario text\r\n\
             a. first choice (5{})\r\n\
             b. second choice (5{})\r\n\
             c. third choice (5{})\r\n",
            n, tag_a, tag_b, tag_c
        )
    }

    #[test]
    fn recovers_categories_from_tags() {
        let text = sample_question(1, 'l', 'c', 'v');
        let questions = parse_question_txt(text.as_bytes()).unwrap();

        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert_eq!(q.choices[0].category, ClassCategory::Mage);
        assert_eq!(q.choices[1].category, ClassCategory::Thief);
        assert_eq!(q.choices[2].category, ClassCategory::Warrior);
        assert!(q.description.starts_with("1. Some scenario"));
    }

    #[test]
    fn digit_line_flushes_previous_question() {
        let text = format!(
            "{}{}",
            sample_question(1, 'l', 'l', 'l'),
            sample_question(2, 'v', 'v', 'v')
        );
        let questions = parse_question_txt(text.as_bytes()).unwrap();

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].choices[0].category, ClassCategory::Mage);
        assert_eq!(questions[1].choices[0].category, ClassCategory::Warrior);
    }

    #[test]
    fn unknown_tag_is_a_format_error() {
        let text = sample_question(1, 'l', 'x', 'v');
        assert!(matches!(
            parse_question_txt(text.as_bytes()),
            Err(AssetError::Format(_))
        ));
    }

    #[test]
    fn empty_line_is_a_format_error() {
        let text = "1. question\n\na. choice (5l)\n";
        assert!(matches!(
            parse_question_txt(text.as_bytes()),
            Err(AssetError::Format(_))
        ));
    }

    #[test]
    fn multi_line_choices_accumulate() {
        let text = "1. question\r\n\
                    a. first line of a\r\n\
                    continued a (5l)\r\n\
                    b. choice b (5c)\r\n\
                    c. choice c (5v)\r\n";
        let questions = parse_question_txt(text.as_bytes()).unwrap();
        assert!(questions[0].choices[0].text.contains("continued a"));
    }
}
