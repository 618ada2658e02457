//! Prompt rendering for expansion and regeneration requests.

use story_tree::{Beat, Genre};

const EXPANSION_TEMPLATE: &str = r#"You are expanding a story using the fractal INICIO-NUDO-DESENLACE structure.

Current sentence: "{{sentence}}"

Expand this sentence into exactly 3 sentences {{genreInstruction}}following the classic narrative structure:

1. **INICIO**: How this situation begins, what sets it up, the initial state or action
2. **NUDO**: What problem, conflict, or complication arises from this situation
3. **DESENLACE**: How this specific situation resolves, concludes, or transforms

Each sentence should:
- Continue naturally from the original sentence
- Follow the specific narrative function (inicio/nudo/desenlace)
- Be a complete, detailed sentence that could be expanded further
- Maintain the same tense and style as the original

Example:
Original: "Un jardinero terrible gana el concurso de Chelsea por coincidencia"
1. INICIO: "Un jardinero de Pimlico que solo sabe mantener vivas las malas hierbas se estrella con su Morris Minor cerca del lugar del concurso"
2. NUDO: "El público piensa que es un jardín conceptual y recibe una mención especial"
3. DESENLACE: "El jardinero tiene que fingir ser un experto cuando lo entrevistan los periodistas"

Respond ONLY with a JSON object in this exact format:
{
  "expansions": [
    "INICIO sentence here",
    "NUDO sentence here",
    "DESENLACE sentence here"
  ]
}

DO NOT OUTPUT ANYTHING OTHER THAN VALID JSON."#;

const REGENERATION_TEMPLATE: &str = r#"You are rewriting one beat of a story that uses the fractal INICIO-NUDO-DESENLACE structure.

Parent sentence: "{{sentence}}"

Write one new {{beat}} sentence {{genreInstruction}}for this parent sentence.
The {{beat}} beat answers: {{beatDescription}}

The sentence should:
- Continue naturally from the parent sentence
- Fulfil only the {{beat}} narrative function
- Be a complete, detailed sentence that could be expanded further
- Maintain the same tense and style as the parent sentence

Respond ONLY with a JSON object in this exact format:
{
  "sentence": "{{beat}} sentence here"
}

DO NOT OUTPUT ANYTHING OTHER THAN VALID JSON."#;

fn genre_instruction(genre: Genre) -> String {
    genre
        .hint()
        .map(|hint| format!("in the {} genre ", hint))
        .unwrap_or_default()
}

/// Prompt asking for the three beats that continue `sentence`.
pub fn expansion_prompt(sentence: &str, genre: Genre) -> String {
    EXPANSION_TEMPLATE
        .replacen("{{genreInstruction}}", &genre_instruction(genre), 1)
        .replacen("{{sentence}}", sentence, 1)
}

/// Prompt asking for a replacement sentence for one beat of `parent`.
pub fn regeneration_prompt(parent: &str, beat: Beat, genre: Genre) -> String {
    // Sentence goes in last so its content is never treated as a placeholder
    REGENERATION_TEMPLATE
        .replace("{{beatDescription}}", beat.description())
        .replace("{{beat}}", beat.label())
        .replacen("{{genreInstruction}}", &genre_instruction(genre), 1)
        .replacen("{{sentence}}", parent, 1)
}
