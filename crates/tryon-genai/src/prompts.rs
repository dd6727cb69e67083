//! Fixed instructions sent to the generative service.

use serde_json::json;
use tryon_models::ItemSelection;

/// Instruction accompanying the clothing photo during item analysis.
pub const ANALYSIS_INSTRUCTION: &str = "Analysez cette image et repérez chaque vêtement et chaque accessoire distinct. \
Donnez à chacun un nom court et descriptif. Répondez uniquement par un tableau JSON de chaînes de caractères, \
par exemple : [\"Robe à fleurs\", \"Chapeau de paille\", \"Lunettes de soleil\"]";

/// Response schema for item analysis: an array of strings.
pub fn analysis_response_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "STRING",
            "description": "Nom du vêtement ou de l'accessoire"
        }
    })
}

/// Rule telling the service which items of the clothing photo to apply.
pub fn item_instruction(selection: &ItemSelection) -> String {
    if selection.is_entire_item() {
        return "À partir de l'Image 2, appliquez sur la personne le vêtement ou l'accessoire principal.".to_string();
    }

    format!(
        "À partir de l'Image 2, appliquez **UNIQUEMENT** ces éléments sur la personne : {}. \
Ignorez tout autre élément présent dans l'Image 2.",
        selection.labels().join(", ")
    )
}

/// Full styling prompt for try-on synthesis.
pub fn build_synthesis_prompt(selection: &ItemSelection) -> String {
    let items = item_instruction(selection);

    format!(
        r#"
MISSION : Vous êtes styliste virtuel et expert en retouche photo.

ENTRÉES :
- Image 1 : une photo d'une personne (le modèle).
- Image 2 : une photo d'un ou plusieurs vêtements ou accessoires.

ÉTAPES :
1. Image 1 : repérez la personne, sa morphologie, sa pose et l'arrière-plan. Ne tenez pas compte des vêtements qu'elle porte : ils doivent être remplacés, pas retouchés.
2. Image 2 : relevez précisément les caractéristiques des articles.
3. Produisez une NOUVELLE image photoréaliste où les articles retenus de l'Image 2 sont portés par la personne de l'Image 1.

RÈGLES :
- {items}
- Les articles doivent être reproduits fidèlement : couleur, longueur des manches et tous les détails conservés.
- Le visage, le corps, la pose et l'arrière-plan de l'Image 1 restent **inchangés**.
- Les articles tombent de façon naturelle et réaliste sur le corps.
- **Aucun texte en sortie.** Répondez uniquement par l'image finale.
"#
    )
}
