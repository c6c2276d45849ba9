//! Prompt text sent to the providers.

use super::MoveRequest;

pub const OPENAI_SYSTEM: &str = "You are a strong chess player with deep understanding of chess strategy and tactics.
You analyze positions carefully, considering:
- Material balance and piece activity
- King safety and pawn structure
- Tactical opportunities (forks, pins, skewers, discovered attacks)
- Positional advantages (control of center, open files, weak squares)
- Short-term tactics vs long-term strategy

Always choose the move that gives you the best advantage.";

pub const ANTHROPIC_SYSTEM: &str = "You are a strong chess player. You MUST respond with ONLY a single chess move in algebraic notation.
DO NOT include any explanation, analysis, or additional text.
DO NOT say things like \"I need to analyze\" or \"Let me think\".
Your entire response must be exactly one move from the legal moves provided, nothing more.";

pub fn openai_user(request: &MoveRequest) -> String {
    format!(
        "Current position (FEN): {fen}

Legal moves: {moves}

Analyze this position and choose your best move. Consider:
1. Are there any tactical opportunities (checks, captures, threats)?
2. What is the opponent threatening?
3. How can you improve your position?

Respond with ONLY the move in standard algebraic notation, nothing else.",
        fen = request.fen,
        moves = request.legal_moves.join(", "),
    )
}

pub fn anthropic_user(request: &MoveRequest) -> String {
    format!(
        "Position (FEN): {fen}

Legal moves: {moves}

Choose your best move considering tactics, threats, and positional advantages.

CRITICAL: Respond with ONLY the move itself (e.g., \"e4\" or \"Nf3\"). No other text whatsoever.",
        fen = request.fen,
        moves = request.legal_moves.join(", "),
    )
}
