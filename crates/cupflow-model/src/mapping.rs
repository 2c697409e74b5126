// SPDX-License-Identifier: Apache-2.0

//! Static reference table mapping known marketplace product listings to the
//! real cup count per kit and the human description the shop actually uses.
//! Backfills `cup_quantity` / `real_description` at import time.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductMapping {
    pub cups_per_kit: u32,
    pub real_description: &'static str,
}

const MAPPINGS: &[(&str, ProductMapping)] = &[
    (
        "Kit 1000 Copos 500ml Personalizado Descartável com Borda Pintada",
        ProductMapping { cups_per_kit: 1000, real_description: "Copos 500ml com Borda sortidas em preto" },
    ),
    (
        "Kit 200 Copos 770ml Personalizado Descartável Bicolor para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 200, real_description: "Copão 770ml Bicolor Rosa e Laranja em preto" },
    ),
    (
        "Kit 600 Copos 500ml Personalizado Descartável com Borda Pintada Compre 600 e Pague 500",
        ProductMapping { cups_per_kit: 600, real_description: "Copos 500ml com Borda sortidas em preto" },
    ),
    (
        "Kit 100 Baldão Personalizado Descartável com tampa  1.8L",
        ProductMapping { cups_per_kit: 100, real_description: "Baldão 1.8L em preto" },
    ),
    (
        "Kit 1000 Copos 500ml Personalizados Descartável Degradê Para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 1000, real_description: "Copos 500ml Degradê sortidos em preto" },
    ),
    (
        "Kit 100 Copos 770ml Personalizado Neon Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 100, real_description: "Copão 770ml Balada Neon em preto" },
    ),
    (
        "Kit 1000 Copão 770ml Bicolor Para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 1000, real_description: "Copão 770ml Bicolor Rosa e Laranja em preto" },
    ),
    (
        "kit 500 copão descartável de770 ml degrade com borda pintada personizado",
        ProductMapping { cups_per_kit: 500, real_description: "Copão 770ml com Borda sortidas em preto" },
    ),
    (
        "kit 1000 copão descartável 770 ml degrade com borda pintada personalizado",
        ProductMapping { cups_per_kit: 1000, real_description: "Copão 770ml Degradê e Borda sortidas em preto" },
    ),
    (
        "Kit 100 Copos 500ml Personalizados Descartável Para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 100, real_description: "Copos 500ml em preto" },
    ),
    (
        "Kit 30 Copos 620ml Twister com Tampa e Canudo Cor Preta para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 30, real_description: "Copos Twister 620ml Preto com tampa preta em BRANCO" },
    ),
    (
        "Kit 500 Copos 770ml Personalizado Balada Neon Para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 500, real_description: "Copão 770ml Balada Neon em preto" },
    ),
    (
        "Kit 150 Copos 770ml Personalizado Descartável Bicolor para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 150, real_description: "Copão 770ml Bicolor Rosa e Laranja em preto" },
    ),
    (
        "Kit 300 Copos 1L Personalizados Descartável Degradê Para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 300, real_description: "Copos 1L Degradê sortidos em preto" },
    ),
    (
        "Kit 500 Copos 770ml Descartável Degradê para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 500, real_description: "Copão 770ml Degradê sortidos em preto" },
    ),
    (
        "Kit 500 Copos 770ml Personalizado  Descartáveis Para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 500, real_description: "500 Copão 770ml em preto" },
    ),
    (
        "Kit 100 Copos 770ml Personalizado Descartável Degradê",
        ProductMapping { cups_per_kit: 100, real_description: "Copão 770ml Degradê sortidos em preto" },
    ),
    (
        "Kit 300 Copos 1L Personalizados Descartável Bicolor Para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 300, real_description: "Copos 1L Bicolor Rosa e Laranja em preto" },
    ),
    (
        "Kit 50 Copos 770ml Personalizado Descartável Degradê Para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 50, real_description: "Copão 770ml Degradê sortidos em preto" },
    ),
    (
        "Kit 100 Copos 300ml Descartável Personalizado Degradê",
        ProductMapping { cups_per_kit: 100, real_description: "Copos 300ml Degradê sortidos em preto" },
    ),
    (
        "Kit 100 Copos 300ml Personalizado Degradê",
        ProductMapping { cups_per_kit: 100, real_description: "Copos 300ml Degradê sortidos em preto" },
    ),
    (
        "Kit 100 Copos 770ml  Personalizado Descartável Transparente Para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 100, real_description: "Copão 770ml em preto" },
    ),
    (
        "Kit 1000 Copos 500ml Personalizado Descartável",
        ProductMapping { cups_per_kit: 1000, real_description: "Copos 500ml em preto" },
    ),
    (
        "Kit 30 Copos 620ml Personalizado Twister com Impressão Label 360° para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 30, real_description: "Copos Label com tampa Preta" },
    ),
    (
        "Kit 300 Copos 500ml Personalizado Descartável Transparente",
        ProductMapping { cups_per_kit: 300, real_description: "Copos 500ml em preto" },
    ),
    (
        "Kit 500 Copos 500ml Personalizado Descartável Degradê Para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 500, real_description: "Copos 500ml Degradê sortidos em preto" },
    ),
    (
        "Kit 150 Copos 500ml Personalizado Descartável Degradê Para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 150, real_description: "Copos 500ml Degradê sortidos em preto" },
    ),
    (
        "kit 1000 copão descartável 770 ml degrade personalizado",
        ProductMapping { cups_per_kit: 1000, real_description: "Copão 770ml Degradê sortidos em preto" },
    ),
    (
        "Kit 1000 Copos 300ml Personalizado Descartável  Para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 1000, real_description: "Copos 300ml em preto" },
    ),
    (
        "Kit 100 Copos 300ml Personalizado Descartável Para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 100, real_description: "Copos 300ml em preto" },
    ),
    (
        "Kit 100 Copos 770ml Personalizados Descartável Bicolor Para Festas Baladas Adegas",
        ProductMapping { cups_per_kit: 100, real_description: "Copão 770ml Bicolor Rosa e Laranja em preto" },
    ),
    (
        "Kit 1000 Copos 770ml Personalizado Descartável para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 1000, real_description: "Copão 770ml em preto" },
    ),
    (
        "Kit 100  Copos 300ml Bicolor Para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 100, real_description: "Copos 300ml Bicolor Rosa e Laranja em preto" },
    ),
    (
        "Kit 100 Copos 770ml Personalizado Descartável Degradê para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 100, real_description: "Copão 770ml Degradê sortidos em preto" },
    ),
    (
        "Kit 200 Copos 770ml Degradê Personalizados  Festas Casamentos Aniversários e Eventos",
        ProductMapping { cups_per_kit: 200, real_description: "Copão 770ml Degradê sortidos em preto" },
    ),
    (
        "Kit 200 Copos 770ml Descartável Degradê Personalizado Para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 200, real_description: "Copão 770ml Degradê sortidos em preto" },
    ),
    (
        "Kit 1000 Copos 500ml Personalizados Descartáveis Para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 1000, real_description: "Copos 500ml em preto" },
    ),
    (
        "Kit 500 Copos 500ml Personalizados Descartáveis Incolor Para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 500, real_description: "Copos 500ml em preto" },
    ),
    (
        "Kit 50 Copos 300ml Personalizados Descartáveis Degradê Para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 50, real_description: "Copos 300ml Degradê sortidos em preto" },
    ),
    (
        "Kit 50 Copos 500ml Personalizados Descartáveis Degradê Para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 50, real_description: "Copos 500ml Degradê sortidos em preto" },
    ),
    (
        "Kit 100 Copos 500ml Personalizado Descartáveis Degradê Para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 100, real_description: "Copos 500ml Degradê sortidos em preto" },
    ),
    (
        "Kit 500 Copos 300ml Descartáveis Para Festas Adegas Casamentos",
        ProductMapping { cups_per_kit: 500, real_description: "Copos 300ml em preto" },
    ),
];

/// Exact match first, then case-insensitive. Listing titles get edited on
/// the marketplace side with inconsistent casing.
#[must_use]
pub fn product_mapping(product_name: &str) -> Option<ProductMapping> {
    if let Some((_, m)) = MAPPINGS.iter().find(|(name, _)| *name == product_name) {
        return Some(*m);
    }
    let lower = product_name.to_lowercase();
    MAPPINGS
        .iter()
        .find(|(name, _)| name.to_lowercase() == lower)
        .map(|(_, m)| *m)
}

/// Total cups for a purchase of `kit_quantity` kits, when the product is known.
#[must_use]
pub fn total_cups_for(product_name: &str, kit_quantity: u32) -> Option<u32> {
    product_mapping(product_name).map(|m| m.cups_per_kit * kit_quantity)
}

#[must_use]
pub fn real_description_for(product_name: &str) -> Option<&'static str> {
    product_mapping(product_name).map(|m| m.real_description)
}
