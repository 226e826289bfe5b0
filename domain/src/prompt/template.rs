//! Prompt templates for the council flow

use crate::council::anonymize::LabeledAnswer;
use crate::council::review::PeerReview;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for the first-opinions stage
    pub fn opinion_system() -> &'static str {
        r#"You are an advisor on a council that deliberates on questions together.
Provide your own independent, well-reasoned answer. You will not see the other
advisors' answers at this stage, so do not speculate about them.
Be direct, thorough, and honest. Do not hedge unnecessarily.
Aim for 200-400 words."#
    }

    /// User prompt for the first-opinions stage
    pub fn opinion_query(question: &str) -> String {
        question.to_string()
    }

    /// System prompt for the cross-review stage
    pub fn review_system() -> &'static str {
        r#"You are evaluating answers to the same question from other AI models.
The models are anonymized with labels like Model A, Model B. Do not play favorites
and do not try to guess which model wrote which answer.
Evaluate reasoning quality: are claims supported, are risks and trade-offs
acknowledged, are conclusions actionable?"#
    }

    /// User prompt for the cross-review stage
    ///
    /// Contains exactly the labeled answers the reviewer is allowed to see;
    /// real names never appear here.
    pub fn review_prompt(question: &str, answers: &[LabeledAnswer]) -> String {
        let mut prompt = format!("Question under deliberation: {question}\n\n");
        prompt.push_str("Here are the other advisors' answers:\n\n");

        let sections: Vec<String> = answers
            .iter()
            .map(|a| format!("**{}:**\n{}", a.label(), a.answer()))
            .collect();
        prompt.push_str(&sections.join("\n\n---\n\n"));

        prompt.push_str(
            r#"

Please:
1. Rank these answers from strongest to weakest, by label
2. Note any significant disagreements between them and why they matter
3. Identify gaps: missing considerations, unsupported claims, or vague conclusions
Be specific and critical. 150-300 words."#,
        );

        prompt
    }

    /// System prompt for the synthesis stage
    pub fn synthesis_system() -> &'static str {
        r#"You are the chairman of an advisory council. Your job is to distill
multiple perspectives into one definitive answer.
Output only valid JSON, no markdown code blocks."#
    }

    /// User prompt for the synthesis stage
    ///
    /// The chairman sees real names tied to answers, but the reviews arrive
    /// unattributed: numbered, with their text referring only to anonymous
    /// labels. The chairman never learns which councilor wrote which review.
    /// The PEER REVIEWS block is present only when reviews were collected.
    pub fn synthesis_prompt(
        question: &str,
        answers: &[(String, String)],
        reviews: &[PeerReview],
    ) -> String {
        let answers_block: Vec<String> = answers
            .iter()
            .map(|(name, answer)| format!("**{name}:**\n{answer}"))
            .collect();

        let mut prompt = format!(
            "Your council was asked:\n\n**QUESTION:** {question}\n\n---\n\n\
             **INDIVIDUAL ANSWERS:**\n\n{}\n\n---\n\n",
            answers_block.join("\n\n")
        );

        if !reviews.is_empty() {
            let reviews_block: Vec<String> = reviews
                .iter()
                .enumerate()
                .map(|(i, r)| format!("**Review {}:**\n{}", i + 1, r.review))
                .collect();
            prompt.push_str(&format!(
                "**PEER REVIEWS:**\n\n{}\n\n---\n\n",
                reviews_block.join("\n\n")
            ));
        }

        prompt.push_str(
            r#"Your job: synthesize all perspectives into one final answer.
Produce a response in the following JSON format (and ONLY JSON, no markdown wrapper):

{
  "final_answer": "A definitive synthesized answer to the question, drawing on the best insights from all advisors.",
  "consensus_points": ["A point all advisors agreed on", "Another point..."],
  "disagreements": [
    {
      "topic": "Short label for what advisors disagreed on",
      "summary": "What the disagreement was and why it matters",
      "chairman_verdict": "Your take on which position is stronger and why"
    }
  ],
  "confidence": "high|medium|low",
  "confidence_note": "Brief note on the confidence level"
}"#,
        );

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::council::anonymize::ReviewAssignment;
    use crate::core::councilor::{Councilor, Role};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_opinion_query_carries_question() {
        let prompt = PromptTemplate::opinion_query("Should we expand to a second region?");
        assert!(prompt.contains("second region"));
    }

    #[test]
    fn test_review_prompt_shows_labels_not_names() {
        let answers = vec![
            (
                Councilor::new("a/one", "Advisor One", Role::Reasoner),
                "First answer.".to_string(),
            ),
            (
                Councilor::new("b/two", "Advisor Two", Role::Knowledge),
                "Second answer.".to_string(),
            ),
            (
                Councilor::new("c/three", "Advisor Three", Role::Generalist),
                "Third answer.".to_string(),
            ),
        ];
        let reviewer = answers[0].0.clone();
        let mut rng = StdRng::seed_from_u64(5);
        let assignment = ReviewAssignment::build(&reviewer, &answers, &mut rng).unwrap();

        let prompt = PromptTemplate::review_prompt("The question?", &assignment.labeled_answers());

        assert!(prompt.contains("Model A"));
        assert!(prompt.contains("Model B"));
        assert!(!prompt.contains("Advisor Two"));
        assert!(!prompt.contains("Advisor Three"));
        // Reviewer's own answer is absent
        assert!(!prompt.contains("First answer."));
    }

    #[test]
    fn test_synthesis_prompt_names_answers_and_schema() {
        let answers = vec![("DeepSeek R1".to_string(), "Go east.".to_string())];
        let prompt = PromptTemplate::synthesis_prompt("Where?", &answers, &[]);

        assert!(prompt.contains("DeepSeek R1"));
        assert!(prompt.contains("\"final_answer\""));
        assert!(prompt.contains("\"disagreements\""));
        assert!(prompt.contains("\"chairman_verdict\""));
        assert!(!prompt.contains("PEER REVIEWS"));
    }

    #[test]
    fn test_synthesis_prompt_includes_reviews_when_present() {
        let answers = vec![("DeepSeek R1".to_string(), "Go east.".to_string())];
        let reviews = vec![
            PeerReview::new("Hermes 3 405B", "Model A is solid."),
            PeerReview::new("Llama 3.3 70B", "Model B hedges too much."),
        ];
        let prompt = PromptTemplate::synthesis_prompt("Where?", &answers, &reviews);

        assert!(prompt.contains("PEER REVIEWS"));
        assert!(prompt.contains("Review 1:"));
        assert!(prompt.contains("Review 2:"));
        assert!(prompt.contains("Model A is solid."));
    }

    #[test]
    fn test_synthesis_prompt_never_attributes_reviews() {
        let answers = vec![("DeepSeek R1".to_string(), "Go east.".to_string())];
        let reviews = vec![PeerReview::new("Hermes 3 405B", "Model A is solid.")];
        let prompt = PromptTemplate::synthesis_prompt("Where?", &answers, &reviews);

        // Real names appear only against answers; the chairman must not
        // learn which councilor wrote which review.
        assert!(!prompt.contains("Hermes 3 405B"));
    }
}
