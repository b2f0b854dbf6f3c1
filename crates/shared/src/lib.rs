use serde::{Deserialize, Serialize};

/// Уникальный идентификатор объекта в сцене
pub type ShapeId = String;

/// Тройка компонент (x, y, z)
pub type Vec3 = [f64; 3];

/// Цвет по умолчанию (индиго)
pub const DEFAULT_COLOR: &str = "#6366f1";

/// Позиция нового объекта из палитры (стоит на плоскости стола)
pub const PALETTE_POSITION: Vec3 = [0.0, 0.5, 0.0];

pub const ZERO_ROTATION: Vec3 = [0.0, 0.0, 0.0];

pub const UNIT_SCALE: Vec3 = [1.0, 1.0, 1.0];

/// Тип примитива
///
/// Неизвестная строка при десериализации превращается в `Box`,
/// чтобы сцена всегда оставалась отображаемой и экспортируемой.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "String")]
pub enum ShapeType {
    #[default]
    Box,
    Sphere,
    Cylinder,
    Cone,
    Torus,
    TorusKnot,
    Dodecahedron,
    Octahedron,
    Capsule,
    Tetrahedron,
    Icosahedron,
    Tube,
    Pyramid,
    Star,
}

impl ShapeType {
    /// Все типы в порядке палитры
    pub const ALL: [ShapeType; 14] = [
        ShapeType::Box,
        ShapeType::Sphere,
        ShapeType::Cylinder,
        ShapeType::Cone,
        ShapeType::Torus,
        ShapeType::TorusKnot,
        ShapeType::Dodecahedron,
        ShapeType::Octahedron,
        ShapeType::Capsule,
        ShapeType::Tetrahedron,
        ShapeType::Icosahedron,
        ShapeType::Tube,
        ShapeType::Pyramid,
        ShapeType::Star,
    ];

    /// Типы, которые может вернуть AI (enum в JSON-схеме ответа)
    pub const AI_KINDS: [ShapeType; 9] = [
        ShapeType::Box,
        ShapeType::Sphere,
        ShapeType::Cylinder,
        ShapeType::Cone,
        ShapeType::Torus,
        ShapeType::TorusKnot,
        ShapeType::Dodecahedron,
        ShapeType::Octahedron,
        ShapeType::Capsule,
    ];

    /// Строковое имя в формате JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeType::Box => "box",
            ShapeType::Sphere => "sphere",
            ShapeType::Cylinder => "cylinder",
            ShapeType::Cone => "cone",
            ShapeType::Torus => "torus",
            ShapeType::TorusKnot => "torusKnot",
            ShapeType::Dodecahedron => "dodecahedron",
            ShapeType::Octahedron => "octahedron",
            ShapeType::Capsule => "capsule",
            ShapeType::Tetrahedron => "tetrahedron",
            ShapeType::Icosahedron => "icosahedron",
            ShapeType::Tube => "tube",
            ShapeType::Pyramid => "pyramid",
            ShapeType::Star => "star",
        }
    }

    /// Имя с заглавной буквы, используется в автоматических именах ("TorusKnot #3")
    pub fn title(&self) -> String {
        let s = self.as_str();
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Разбор строки; `None` для неизвестного типа
    pub fn parse(s: &str) -> Option<ShapeType> {
        ShapeType::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

impl From<String> for ShapeType {
    fn from(s: String) -> Self {
        ShapeType::parse(&s).unwrap_or_default()
    }
}

impl std::fmt::Display for ShapeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Объект сцены: единственная сохраняемая сущность редактора
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeObject {
    pub id: ShapeId,
    #[serde(rename = "type")]
    pub kind: ShapeType,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub color: String,
    pub name: String,
}

impl ShapeObject {
    /// Применить частичное обновление: меняются только переданные поля
    pub fn apply(&mut self, patch: &ShapePatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(scale) = patch.scale {
            self.scale = scale;
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
    }
}

/// Частичное обновление объекта (все поля необязательны)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShapePatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ShapeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ShapePatch {
    /// Полная поза (после отпускания манипулятора)
    pub fn pose(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            position: Some(position),
            rotation: Some(rotation),
            scale: Some(scale),
            ..Default::default()
        }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.position.is_none()
            && self.rotation.is_none()
            && self.scale.is_none()
            && self.color.is_none()
            && self.name.is_none()
    }
}

/// Режим манипулятора
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

/// Частичный объект, предложенный AI
///
/// Схема требует все поля, но модель может их опустить.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SuggestedShape {
    #[serde(rename = "type", default)]
    pub kind: Option<ShapeType>,
    #[serde(default)]
    pub position: Option<Vec3>,
    #[serde(default)]
    pub scale: Option<Vec3>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Разбор цвета "#rrggbb" (решётка необязательна)
pub fn parse_hex_color(s: &str) -> Option<[u8; 3]> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Цвет в формате "#rrggbb"
pub fn format_hex_color(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ShapeObject {
        ShapeObject {
            id: "a".to_string(),
            kind: ShapeType::Sphere,
            position: [1.0, 2.0, 3.0],
            rotation: ZERO_ROTATION,
            scale: UNIT_SCALE,
            color: DEFAULT_COLOR.to_string(),
            name: "Ball".to_string(),
        }
    }

    #[test]
    fn test_shape_type_serde_camel_case() {
        let json = serde_json::to_string(&ShapeType::TorusKnot).unwrap();
        assert_eq!(json, r#""torusKnot""#);
        let back: ShapeType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ShapeType::TorusKnot);
    }

    #[test]
    fn test_unknown_shape_type_falls_back_to_box() {
        let t: ShapeType = serde_json::from_str(r#""hyperboloid""#).unwrap();
        assert_eq!(t, ShapeType::Box);
        assert_eq!(ShapeType::parse("hyperboloid"), None);
    }

    #[test]
    fn test_shape_object_type_field_name() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["type"], "sphere");
        assert_eq!(json["position"][2], 3.0);
    }

    #[test]
    fn test_apply_patch_touches_only_present_fields() {
        let mut obj = sample();
        let before = obj.clone();
        obj.apply(&ShapePatch::color("#ff0000"));

        assert_eq!(obj.color, "#ff0000");
        assert_eq!(obj.id, before.id);
        assert_eq!(obj.kind, before.kind);
        assert_eq!(obj.position, before.position);
        assert_eq!(obj.rotation, before.rotation);
        assert_eq!(obj.scale, before.scale);
        assert_eq!(obj.name, before.name);
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let mut obj = sample();
        let patch = ShapePatch::default();
        assert!(patch.is_empty());
        obj.apply(&patch);
        assert_eq!(obj, sample());
    }

    #[test]
    fn test_suggested_shape_missing_fields() {
        let s: SuggestedShape = serde_json::from_str(r#"{"name": "Leg"}"#).unwrap();
        assert_eq!(s.name.as_deref(), Some("Leg"));
        assert!(s.kind.is_none());
        assert!(s.position.is_none());
    }

    #[test]
    fn test_title() {
        assert_eq!(ShapeType::Box.title(), "Box");
        assert_eq!(ShapeType::TorusKnot.title(), "TorusKnot");
    }

    #[test]
    fn test_ai_kinds_subset_of_all() {
        for kind in ShapeType::AI_KINDS {
            assert!(ShapeType::ALL.contains(&kind));
        }
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(parse_hex_color("#6366f1"), Some([0x63, 0x66, 0xf1]));
        assert_eq!(parse_hex_color("FF0000"), Some([255, 0, 0]));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(format_hex_color([255, 0, 16]), "#ff0010");
    }
}
