//! Progressive hint policies.
//!
//! Each question type has a generator producing up to three hints ordered
//! from general to specific. The set is then padded with the generator's
//! closing hint and truncated, so callers always receive exactly the
//! configured number of hints. Repeated closing hints are expected output.

use crate::model::QuestionType;
use crate::scheme;

/// How a generator fills the set up to the configured level count.
#[derive(Debug, Clone, Copy)]
enum Closing {
    /// Repeat the generator's own last hint.
    RepeatLast,
    /// Repeat a fixed wrap-up hint.
    Fixed(&'static str),
}

/// Generate exactly `hint_levels` hints for a question.
pub fn generate_hints(
    question_type: QuestionType,
    question_text: &str,
    marking_text: &str,
    hint_levels: usize,
) -> Vec<String> {
    let question = question_text.to_lowercase();
    let (hints, closing) = match question_type {
        QuestionType::MultipleChoice => multiple_choice_hints(&question, marking_text),
        QuestionType::Calculation => calculation_hints(question_text, marking_text),
        QuestionType::ShortAnswer => short_answer_hints(&question, marking_text),
        QuestionType::Essay => essay_hints(&question, marking_text),
        QuestionType::Graph => graph_hints(&question, marking_text),
        QuestionType::Other => generic_hints(),
    };
    pad_hints(hints, closing, hint_levels)
}

/// Pad `message` to a full hint set; used when no generator can run.
pub fn repeated(message: &str, hint_levels: usize) -> Vec<String> {
    vec![message.to_string(); hint_levels]
}

fn pad_hints(mut hints: Vec<String>, closing: Closing, hint_levels: usize) -> Vec<String> {
    while hints.len() < hint_levels {
        let next = match closing {
            Closing::RepeatLast => hints.last().cloned().unwrap_or_default(),
            Closing::Fixed(text) => text.to_string(),
        };
        hints.push(next);
    }
    hints.truncate(hint_levels);
    hints
}

fn multiple_choice_hints(question: &str, marking_text: &str) -> (Vec<String>, Closing) {
    let hints = if scheme::correct_option(marking_text).is_some() {
        let specific = if question.contains("not") || question.contains("except") {
            "Be careful with negative questions - you're looking for the option that is NOT correct."
        } else {
            "Look for key terms in the question that match with one of the options."
        };
        vec![
            "Read the question carefully and consider all options before making your choice."
                .to_string(),
            "Try to eliminate obviously incorrect options first.".to_string(),
            specific.to_string(),
        ]
    } else {
        vec![
            "Read the question carefully and consider all options.".to_string(),
            "Try to eliminate obviously incorrect options.".to_string(),
            "Look for key terms in the question that match with one of the options.".to_string(),
        ]
    };
    (hints, Closing::RepeatLast)
}

fn calculation_hints(question_text: &str, marking_text: &str) -> (Vec<String>, Closing) {
    let mut hints =
        vec!["Identify the key information given in the question and what you need to find."
            .to_string()];

    hints.push(match scheme::formula(marking_text) {
        Some(formula) => format!("Consider using the formula: {formula}"),
        None => {
            "Think about which formula or mathematical relationship applies to this problem."
                .to_string()
        }
    });

    hints.push(match scheme::steps(marking_text) {
        Some(steps) => format!("Follow these steps: {steps}"),
        None => {
            let numbers = scheme::numbers(question_text);
            if numbers.is_empty() {
                "Break down the problem into smaller steps and solve each step methodically."
                    .to_string()
            } else {
                format!(
                    "Use the values given in the question ({}) and apply the appropriate formula.",
                    numbers.join(", ")
                )
            }
        }
    });

    (
        hints,
        Closing::Fixed("Check your calculations carefully and make sure your units are correct."),
    )
}

fn short_answer_hints(question: &str, marking_text: &str) -> (Vec<String>, Closing) {
    let mut hints = vec!["Think about the key concepts related to this question.".to_string()];

    let wording = if question.contains("define") || question.contains("what is") {
        "This question is asking for a definition. Make sure your answer is clear and concise."
    } else if question.contains("explain") {
        "This question is asking for an explanation. Make sure to include the 'how' and 'why'."
    } else if question.contains("compare") {
        "This question is asking you to compare. Make sure to discuss similarities and differences."
    } else {
        "Make sure your answer addresses all parts of the question."
    };
    hints.push(wording.to_string());

    let lead_words = lead_words(marking_text);
    hints.push(match lead_words.as_slice() {
        [] => "Make sure your answer is specific and uses appropriate terminology.".to_string(),
        [first, second, _, ..] => {
            format!("Your answer should include points about {first} and {second}...")
        }
        [first, ..] => format!("Your answer should include a point about {first}..."),
    });

    (
        hints,
        Closing::Fixed("Review your notes on this topic and make sure your answer is complete."),
    )
}

fn essay_hints(question: &str, marking_text: &str) -> (Vec<String>, Closing) {
    let mut hints = vec![
        "Structure your essay with an introduction, main body paragraphs, and a conclusion."
            .to_string(),
    ];

    let wording = if question.contains("discuss") {
        "This question is asking you to discuss. Present different perspectives and arguments."
    } else if question.contains("analyze") || question.contains("analyse") {
        "This question is asking you to analyze. Break down the topic and examine each part in detail."
    } else if question.contains("evaluate") {
        "This question is asking you to evaluate. Assess the strengths and weaknesses, and make a judgment."
    } else {
        "Make sure your essay addresses all aspects of the question and provides supporting evidence."
    };
    hints.push(wording.to_string());

    let lead_words = lead_words(marking_text);
    hints.push(match lead_words.as_slice() {
        [] => "Make sure your essay is well-structured, uses appropriate terminology, and provides evidence to support your arguments.".to_string(),
        [first, second, third, ..] => {
            format!("Your essay should include points about {first}, {second} and {third}...")
        }
        [first, ..] => format!("Your essay should include a point about {first}..."),
    });

    (
        hints,
        Closing::Fixed(
            "Review your notes on this topic and make sure your essay is comprehensive and well-structured.",
        ),
    )
}

fn graph_hints(question: &str, marking_text: &str) -> (Vec<String>, Closing) {
    let marking = marking_text.to_lowercase();
    let mut hints =
        vec!["Make sure you understand what type of graph you need to draw or interpret."
            .to_string()];

    let axes = if ["draw", "sketch", "plot"].iter().any(|w| question.contains(w)) {
        "Label your axes clearly with appropriate units and choose a suitable scale."
    } else {
        "Look carefully at the axes labels and units to understand what the graph is showing."
    };
    hints.push(axes.to_string());

    let specific = if marking.contains("gradient") || marking.contains("slope") {
        "Calculate the gradient (slope) of the graph by finding the change in y divided by the change in x."
    } else if marking.contains("area") {
        "Consider calculating the area under the graph, which may represent a physical quantity."
    } else if marking.contains("intercept") {
        "Find where the graph crosses the axes (the intercepts), as these points often have physical significance."
    } else {
        "Look for patterns or trends in the graph and think about what they represent in the context of the question."
    };
    hints.push(specific.to_string());

    (
        hints,
        Closing::Fixed(
            "Make sure your graph is accurate, clearly labeled, and addresses all parts of the question.",
        ),
    )
}

fn generic_hints() -> (Vec<String>, Closing) {
    (
        vec![
            "Read the question carefully and identify exactly what you're being asked to do."
                .to_string(),
            "Break down the question into smaller parts and tackle each part systematically."
                .to_string(),
            "Make sure your answer is clear, concise, and directly addresses the question."
                .to_string(),
        ],
        Closing::Fixed(
            "Review your notes on this topic and make sure your answer is complete and accurate.",
        ),
    )
}

/// First word of each key point, without revealing the rest of the point.
fn lead_words(marking_text: &str) -> Vec<String> {
    scheme::segment_points(marking_text)
        .iter()
        .filter_map(|point| point.split_whitespace().next())
        .map(str::to_string)
        .collect()
}
