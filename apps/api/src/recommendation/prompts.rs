// Prompt constants for personalized food recommendations.

/// System prompt for the recommendation call. Append `JSON_ONLY_INSTRUCTION`.
pub const RECOMMENDATION_SYSTEM: &str = "You are a nutrition AI assistant. \
    Based on the user's profile and the food they're about to eat, provide a personalized recommendation. \
    Be specific to the user's situation. Don't give generic advice.";

/// Recommendation prompt template. Replace `{user_json}` and `{food_json}`.
pub const RECOMMENDATION_PROMPT_TEMPLATE: &str = r#"Analyze:
1. The food's nutritional value
2. The user's health goals and current metrics
3. The user's dietary restrictions and medical conditions
4. How this food fits into their daily nutrition targets

User Profile:
{user_json}

Food Being Consumed:
{food_json}

Return a JSON object with this EXACT schema:
{
  "recommendation": "good" | "moderate" | "avoid",
  "recommendation_reason": "A brief, personalized explanation (2-3 sentences) about why this is good/moderate/avoid for THIS specific user based on their goals, health conditions, and nutritional needs.",
  "nutritional_insights": "Brief insight about the food's nutritional value",
  "suggestion": "A practical suggestion for this user"
}"#;
