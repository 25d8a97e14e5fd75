/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub question_number: usize,
    pub total: usize,
    pub total_guesses: u32,
    pub correct_guesses: u32,
    pub is_complete: bool,
}
