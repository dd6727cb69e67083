//! User-facing (French) messages.

pub const MISSING_CLOTHING_IMAGE: &str = "Veuillez télécharger l'image du vêtement/accessoire.";
pub const MISSING_SOURCE_IMAGES: &str = "Les images source sont manquantes.";
pub const EMPTY_SELECTION: &str = "Veuillez sélectionner au moins un article à générer.";
pub const ANALYSIS_FAILED: &str = "L'analyse de l'image pour les articles a échoué.";
pub const SYNTHESIS_FAILED: &str = "La génération d'image a échoué. Veuillez réessayer.";
pub const NO_IMAGE_RETURNED: &str = "L'IA n'a pas retourné d'image. Veuillez réessayer avec d'autres images.";
pub const CAMERA_UNAVAILABLE: &str =
    "Impossible d'accéder à la caméra. Veuillez vérifier les permissions de votre appareil.";
pub const ACTION_UNAVAILABLE: &str = "Cette action n'est pas disponible pour le moment.";
pub const NOT_AN_IMAGE: &str = "Le fichier sélectionné n'est pas une image.";

/// Status lines cycled while the try-on image is generated.
pub const GENERATING_STATUS: [&str; 5] = [
    "Préparation des images...",
    "L'IA analyse votre style...",
    "Création de votre nouveau look...",
    "Un instant, la magie opère...",
    "Finalisation de l'image...",
];

/// Message embedding the service's own explanation verbatim.
pub fn text_instead_of_image(text: &str) -> String {
    format!("L'IA a répondu avec du texte au lieu d'une image : \"{}\"", text)
}

pub fn unknown_item(label: &str) -> String {
    format!("Article inconnu : {}", label)
}
