use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Fr,
    En,
}

static CURRENT_LANG: AtomicU8 = AtomicU8::new(0); // 0=Fr (default)

pub fn lang() -> Lang {
    match CURRENT_LANG.load(Ordering::Relaxed) {
        1 => Lang::En,
        _ => Lang::Fr,
    }
}

pub fn set_lang(l: Lang) {
    CURRENT_LANG.store(
        match l {
            Lang::Fr => 0,
            Lang::En => 1,
        },
        Ordering::Relaxed,
    );
}

/// Translate a key to the current language.
pub fn t(key: &str) -> &'static str {
    let fr = lang() == Lang::Fr;
    match key {
        // ── Header ──────────────────────────────────────────
        "app.title" => "MAKER3D STUDIO",
        "app.subtitle" => if fr { "Prototypage IA Rapide" } else { "Rapid AI Prototyping" },

        // ── Main menus ──────────────────────────────────────
        "menu.file" => if fr { "Fichier" } else { "File" },
        "menu.new" => if fr { "Nouvelle scène" } else { "New scene" },
        "menu.export_stl" => if fr { "Exporter STL..." } else { "Export STL..." },
        "menu.export_title" => if fr { "Exporter la scène en STL" } else { "Export scene as STL" },
        "menu.quit" => if fr { "Quitter" } else { "Quit" },

        "menu.edit" => if fr { "Édition" } else { "Edit" },
        "menu.duplicate" => if fr { "Dupliquer  Ctrl+D" } else { "Duplicate  Ctrl+D" },
        "menu.delete" => if fr { "Supprimer  Suppr" } else { "Delete  Del" },
        "menu.deselect" => if fr { "Désélectionner  Échap" } else { "Deselect  Esc" },

        "menu.view" => if fr { "Affichage" } else { "View" },
        "menu.scene_tree" => if fr { "Explorateur" } else { "Explorer" },
        "menu.properties" => if fr { "Propriétés" } else { "Properties" },
        "menu.assistant" => if fr { "Assistant IA" } else { "AI Assistant" },
        "menu.reset_camera" => if fr { "Réinitialiser la caméra" } else { "Reset camera" },
        "menu.focus" => if fr { "Centrer sur la sélection  F" } else { "Focus selection  F" },
        "menu.language" => if fr { "Langue" } else { "Language" },

        "menu.create" => if fr { "Créer" } else { "Create" },
        "menu.settings" => if fr { "Réglages..." } else { "Settings..." },

        // ── Primitives ──────────────────────────────────────
        "prim.box" => "Cube",
        "prim.sphere" => if fr { "Sphère" } else { "Sphere" },
        "prim.cylinder" => if fr { "Cylindre" } else { "Cylinder" },
        "prim.cone" => if fr { "Cône" } else { "Cone" },
        "prim.torus" => if fr { "Tore" } else { "Torus" },
        "prim.torusKnot" => if fr { "Nœud" } else { "Knot" },
        "prim.dodecahedron" => "Dodeca",
        "prim.octahedron" => "Octa",
        "prim.capsule" => "Capsule",
        "prim.tetrahedron" => "Tetra",
        "prim.icosahedron" => "Icosa",
        "prim.tube" => "Tube",
        "prim.pyramid" => if fr { "Pyramide" } else { "Pyramid" },
        "prim.star" => if fr { "Étoile" } else { "Star" },

        // ── Toolbar ─────────────────────────────────────────
        "tb.blocks" => if fr { "Stock de Blocs" } else { "Block Stock" },
        "tb.manipulation" => "Manipulation",
        "tb.translate" => if fr { "Déplacer (W)" } else { "Move (W)" },
        "tb.rotate" => if fr { "Pivoter (E)" } else { "Rotate (E)" },
        "tb.scale" => if fr { "Échelle (R)" } else { "Scale (R)" },
        "tb.export" => if fr { "Exporter STL" } else { "Export STL" },
        "tb.export_empty" => if fr { "La scène est vide" } else { "The scene is empty" },

        // ── Scene tree ──────────────────────────────────────
        "tree.title" => if fr { "Explorateur" } else { "Explorer" },
        "tree.empty" => if fr { "Zone de dépôt vide" } else { "Drop zone empty" },
        "tree.delete" => if fr { "Supprimer" } else { "Delete" },
        "tree.duplicate" => if fr { "Dupliquer" } else { "Duplicate" },
        "tree.focus" => if fr { "Centrer la vue" } else { "Focus camera" },

        // ── Properties ──────────────────────────────────────
        "props.title" => if fr { "Propriétés" } else { "Properties" },
        "props.no_selection" => if fr { "Aucun objet sélectionné" } else { "No object selected" },
        "props.id" => if fr { "Identifiant Unique" } else { "Unique Identifier" },
        "props.name" => if fr { "Nom" } else { "Name" },
        "props.type" => if fr { "Forme" } else { "Shape" },
        "props.color" => if fr { "Couleur" } else { "Color" },
        "props.transform" => if fr { "Transformations" } else { "Transforms" },
        "props.position" => "Position",
        "props.rotation" => "Rotation (°)",
        "props.scale" => if fr { "Échelle" } else { "Scale" },

        // ── AI assistant ────────────────────────────────────
        "ai.title" => if fr { "Assistant Magic 3D" } else { "Magic 3D Assistant" },
        "ai.description" => if fr {
            "Décris ce que tu veux créer (ex: \"un porte-crayon\", \"une fusée\") et l'IA ajoutera les formes pour toi."
        } else {
            "Describe what you want to build (e.g. \"a pencil holder\", \"a rocket\") and the AI will add the shapes for you."
        },
        "ai.placeholder" => if fr { "Ex: Une petite voiture..." } else { "E.g. A small car..." },
        "ai.send" => if fr { "Générer" } else { "Generate" },
        "ai.thinking" => if fr { "Génération en cours..." } else { "Generating..." },
        "ai.clear" => if fr { "Effacer" } else { "Clear" },
        "ai.you" => if fr { "Vous" } else { "You" },
        "ai.bot" => if fr { "IA" } else { "AI" },
        "ai.added" => if fr { "objet(s) ajouté(s)" } else { "object(s) added" },
        "ai.fallback_name" => if fr { "IA Object" } else { "AI Object" },
        "ai.error" => if fr { "Erreur lors de la génération avec l'IA." } else { "AI generation failed." },
        "ai.tips" => if fr { "Conseils :" } else { "Tips:" },
        "ai.tip1" => if fr { "Sois précis sur les formes" } else { "Be precise about shapes" },
        "ai.tip2" => if fr { "L'IA utilise des primitives de base" } else { "The AI uses basic primitives" },
        "ai.tip3" => if fr { "Tu peux modifier les formes après" } else { "You can edit the shapes afterwards" },
        "ai.tip4" => if fr { "Idéal pour dégrossir un projet" } else { "Great for roughing out a project" },

        // ── Status bar ──────────────────────────────────────
        "status.objects" => if fr { "Objets" } else { "Objects" },
        "status.triangles" => "Triangles",
        "status.selected" => if fr { "Sélection" } else { "Selected" },
        "status.none" => if fr { "aucune" } else { "none" },
        "status.mode" => "Mode",
        "status.ai_busy" => if fr { "IA en cours..." } else { "AI working..." },
        "status.nav_hint" => if fr {
            "Clic Gauche: Sélectionner  |  Clic Droit: Pivoter Caméra  |  Molette: Zoom"
        } else {
            "Left Click: Select  |  Right Click: Orbit Camera  |  Wheel: Zoom"
        },

        "viewport.name_hint" => if fr { "Nom de l'objet..." } else { "Object name..." },

        "mode.translate" => if fr { "Déplacer" } else { "Move" },
        "mode.rotate" => if fr { "Pivoter" } else { "Rotate" },
        "mode.scale" => if fr { "Échelle" } else { "Scale" },

        // ── Settings window ─────────────────────────────────
        "settings.title" => if fr { "Réglages" } else { "Settings" },
        "settings.grid" => if fr { "Grille" } else { "Grid" },
        "settings.grid_visible" => if fr { "Afficher la grille" } else { "Show grid" },
        "settings.grid_size" => if fr { "Taille de cellule" } else { "Cell size" },
        "settings.grid_range" => if fr { "Étendue" } else { "Range" },
        "settings.grid_opacity" => if fr { "Opacité" } else { "Opacity" },

        "settings.axes" => "Axes",
        "settings.axes_visible" => if fr { "Afficher les axes" } else { "Show axes" },
        "settings.axes_length" => if fr { "Longueur des flèches" } else { "Arrow length" },
        "settings.axes_labels" => if fr { "Afficher les étiquettes" } else { "Show labels" },

        "settings.viewport" => if fr { "Vue 3D" } else { "Viewport" },
        "settings.bg_color" => if fr { "Couleur de fond" } else { "Background color" },
        "settings.gizmo_size" => if fr { "Taille du manipulateur" } else { "Gizmo size" },

        "settings.ui" => "Interface",
        "settings.font_size" => if fr { "Taille de police" } else { "Font size" },

        "settings.ai" => if fr { "Intelligence artificielle" } else { "Artificial intelligence" },
        "settings.ai_model" => if fr { "Modèle" } else { "Model" },
        "settings.ai_endpoint" => if fr { "Point d'accès" } else { "Endpoint" },
        "settings.ai_key_hint" => if fr {
            "La clé API est lue depuis GEMINI_API_KEY (ou API_KEY)."
        } else {
            "The API key is read from GEMINI_API_KEY (or API_KEY)."
        },

        "settings.apply" => if fr { "Appliquer" } else { "Apply" },
        "settings.reset" => if fr { "Réinitialiser" } else { "Reset" },
        "settings.close" => if fr { "Fermer" } else { "Close" },

        // ── Fallback ────────────────────────────────────────
        _ => "???",
    }
}

/// Palette label of a shape kind
pub fn shape_label(kind: shared::ShapeType) -> &'static str {
    match kind {
        shared::ShapeType::Box => t("prim.box"),
        shared::ShapeType::Sphere => t("prim.sphere"),
        shared::ShapeType::Cylinder => t("prim.cylinder"),
        shared::ShapeType::Cone => t("prim.cone"),
        shared::ShapeType::Torus => t("prim.torus"),
        shared::ShapeType::TorusKnot => t("prim.torusKnot"),
        shared::ShapeType::Dodecahedron => t("prim.dodecahedron"),
        shared::ShapeType::Octahedron => t("prim.octahedron"),
        shared::ShapeType::Capsule => t("prim.capsule"),
        shared::ShapeType::Tetrahedron => t("prim.tetrahedron"),
        shared::ShapeType::Icosahedron => t("prim.icosahedron"),
        shared::ShapeType::Tube => t("prim.tube"),
        shared::ShapeType::Pyramid => t("prim.pyramid"),
        shared::ShapeType::Star => t("prim.star"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ShapeType;

    #[test]
    fn test_every_shape_has_a_label() {
        for kind in ShapeType::ALL {
            assert_ne!(shape_label(kind), "???", "{kind}");
        }
        assert_eq!(t("no.such.key"), "???");
    }

    #[test]
    fn test_lang_serde() {
        assert_eq!(serde_json::to_string(&Lang::Fr).unwrap(), "\"fr\"");
        assert_eq!(serde_json::from_str::<Lang>("\"en\"").unwrap(), Lang::En);
    }
}
