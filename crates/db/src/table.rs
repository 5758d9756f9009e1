use sea_query::Iden;

#[derive(Iden, Clone, Copy)]
pub enum Ingredient {
    Table,
    Id,
    BaseName,
    DisplayName,
    Category,
    ExtractionTemp,
    ExtractionTime,
    CookingOverview,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum Alias {
    Table,
    Id,
    IngredientId,
    Name,
    Language,
}

/// Concentrations are stored as decimal text, mg per 100 g.
#[derive(Iden, Clone, Copy)]
pub enum Chemistry {
    Table,
    IngredientId,
    Glu,
    Asp,
    Imp,
    Gmp,
    Amp,
    UmamiAa,
    UmamiNuc,
    UmamiSynergy,
}

#[derive(Iden, Clone, Copy)]
pub enum Tcm {
    Table,
    IngredientId,
    FourQi,
    FiveFlavors,
    Meridians,
    Overview,
    Confidence,
}

#[derive(Iden, Clone, Copy)]
pub enum Flags {
    Table,
    IngredientId,
    Allergens,
    DietaryRestrictions,
    UmamiTags,
    FlavorTags,
}
