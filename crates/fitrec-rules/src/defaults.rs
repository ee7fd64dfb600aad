//! Built-in reference tables: plan templates, tier limits, age bands and
//! guidance text.

use fitrec_core::{ExperienceLevel, Goal};

use crate::types::*;

use ExperienceLevel::{Advanced, Beginner, Intermediate};

fn s(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn session(focus: &str, exercises: &[&str], duration_minutes: u32, load: f64) -> WorkoutEntry {
    WorkoutEntry {
        day: String::new(),
        focus: focus.to_string(),
        exercises: s(exercises),
        duration_minutes,
        load,
    }
}

fn meals(items: &[(&str, &str)]) -> Vec<DietEntry> {
    items
        .iter()
        .map(|(meal, guidance)| DietEntry { meal: meal.to_string(), guidance: guidance.to_string() })
        .collect()
}

/// Numbers the rotation "Day 1", "Day 2", ...
fn rotation(mut entries: Vec<WorkoutEntry>) -> Vec<WorkoutEntry> {
    for (i, e) in entries.iter_mut().enumerate() {
        e.day = format!("Day {}", i + 1);
    }
    entries
}

fn template(
    goal: Goal,
    experience: ExperienceLevel,
    sessions_per_week: u8,
    (floor, target, ceiling): (f64, f64, f64),
    workout: Vec<WorkoutEntry>,
) -> PlanTemplate {
    PlanTemplate {
        goal,
        experience,
        sessions_per_week,
        intensity: IntensityBounds::new(floor, target, ceiling),
        workout: rotation(workout),
        diet: diet(goal),
    }
}

fn diet(goal: Goal) -> Vec<DietEntry> {
    match goal {
        Goal::WeightLoss => meals(&[
            ("Breakfast", "Protein-forward start: eggs or Greek yogurt with berries and oats"),
            ("Lunch", "Lean protein (chicken breast, fish, tofu or legumes) over leafy greens with quinoa or brown rice"),
            ("Snack", "Fibre-rich snack for satiety: an apple or citrus fruit with a handful of nuts"),
            ("Dinner", "Lean protein with broccoli, bell peppers and a small portion of sweet potato"),
            ("Macros", "Protein 25-30%, carbohydrates 35-45%, fats 20-30% of total calories"),
            ("Principles", "Moderate deficit of 300-500 kcal below maintenance; control portions and meal timing"),
            ("Timing", "Eat 4-5 smaller meals through the day to keep blood sugar stable"),
        ]),
        Goal::MuscleGain => meals(&[
            ("Breakfast", "Oats with protein powder or eggs, plus nut butter for extra calories"),
            ("Lunch", "Lean meat with rice or pasta and vegetables"),
            ("Post-workout", "Protein plus carbohydrates within 30-60 minutes of training"),
            ("Dinner", "High-quality protein with potatoes and vegetables"),
            ("Snack", "Calorie-dense foods: Greek yogurt, nuts, dried fruit"),
            ("Macros", "Protein 1.6-2.2 g per kg body weight, carbohydrates 45-55%, fats 20-30% of total calories"),
            ("Principles", "Slight surplus of 200-500 kcal above maintenance; stay hydrated and sleep well"),
            ("Supplements", "Consider creatine, whey protein and vitamin D after consulting a healthcare provider"),
        ]),
        Goal::Endurance => meals(&[
            ("Breakfast", "Oatmeal with banana; carb-rich meal 3-4 hours before long sessions"),
            ("Lunch", "Pasta, rice or quinoa with fatty fish or lean protein"),
            ("During training", "Simple carbohydrates on long efforts: sports drinks, bananas"),
            ("Dinner", "Complex carbohydrates with anti-inflammatory foods such as fatty fish and turmeric"),
            ("Snack", "Hydrating foods: watermelon, cucumber, soups; tart cherries for recovery"),
            ("Macros", "Carbohydrates 55-65%, protein 15-20%, fats 20-25% of total calories"),
            ("Principles", "Keep carbohydrate availability high; manage hydration and electrolytes"),
        ]),
        Goal::Maintenance => meals(&[
            ("Breakfast", "Whole grains with seasonal fruit and a protein source"),
            ("Lunch", "Varied whole foods from all food groups"),
            ("Dinner", "Lean protein, whole grains and seasonal vegetables"),
            ("Snack", "Moderate treats are fine within the 80/20 rule"),
            ("Macros", "Protein 15-25%, carbohydrates 45-50%, fats 25-35% of total calories"),
            ("Principles", "Maintain current intake; favour nutrient density and mindful eating"),
        ]),
    }
}

fn templates() -> Vec<PlanTemplate> {
    vec![
        // Weight loss
        template(Goal::WeightLoss, Beginner, 3, (4.0, 5.5, 6.5), vec![
            session("Low-impact cardio", &["Cycling", "Brisk walking"], 30, 1.0),
            session("Circuit training", &["Bodyweight squats", "Push-ups", "Mountain climbers"], 25, 0.9),
            session("Active recovery", &["Walking", "Stretching"], 20, 0.6),
        ]),
        template(Goal::WeightLoss, Intermediate, 4, (5.0, 7.0, 8.0), vec![
            session("HIIT", &["Burpees", "Jump squats", "Mountain climbers", "Push-ups"], 30, 1.0),
            session("Compound strength", &["Deadlifts", "Squats", "Pull-ups", "Overhead press"], 45, 0.9),
            session("Steady cardio", &["Running/Jogging"], 40, 0.8),
            session("Low-impact cardio", &["Cycling"], 45, 0.7),
        ]),
        template(Goal::WeightLoss, Advanced, 5, (6.0, 8.5, 9.5), vec![
            session("HIIT", &["Burpees", "Jump squats", "Sprint intervals", "Jump rope"], 30, 1.0),
            session("Compound strength", &["Deadlifts", "Squats", "Pull-ups", "Overhead press"], 50, 0.95),
            session("Steady cardio", &["Running/Jogging"], 45, 0.8),
            session("Metabolic circuit", &["Box jumps", "Kettlebell swings", "Mountain climbers"], 35, 0.9),
            session("Long cardio", &["Cycling"], 60, 0.7),
        ]),
        // Muscle gain
        template(Goal::MuscleGain, Beginner, 3, (4.0, 5.5, 6.5), vec![
            session("Full body A", &["Goblet squats", "Push-ups", "Dumbbell rows"], 45, 1.0),
            session("Full body B", &["Romanian deadlifts", "Dumbbell bench press", "Lat pulldowns"], 45, 1.0),
            session("Light cardio", &["Walking", "Light cycling"], 25, 0.5),
        ]),
        template(Goal::MuscleGain, Intermediate, 4, (5.5, 7.0, 8.0), vec![
            session("Push", &["Bench press", "Overhead press", "Dips"], 60, 1.0),
            session("Pull", &["Deadlifts", "Rows", "Pull-ups"], 60, 1.0),
            session("Legs", &["Squats", "Romanian deadlifts", "Walking lunges"], 60, 1.0),
            session("LISS", &["Swimming", "Light cycling"], 25, 0.5),
        ]),
        template(Goal::MuscleGain, Advanced, 5, (6.5, 9.0, 9.5), vec![
            session("Push (chest, shoulders, triceps)", &["Bench press", "Overhead press", "Weighted dips"], 75, 1.0),
            session("Pull (back, biceps)", &["Deadlifts", "Rows", "Weighted pull-ups"], 75, 1.0),
            session("Legs (quads, hamstrings, glutes)", &["Squats", "Romanian deadlifts", "Jumping lunges"], 75, 1.0),
            session("Upper hypertrophy", &["Incline press", "Cable rows", "Lateral raises"], 60, 0.9),
            session("Lower hypertrophy", &["Front squats", "Hip thrusts", "Box jumps"], 60, 0.9),
        ]),
        // Endurance
        template(Goal::Endurance, Beginner, 3, (4.0, 5.0, 6.5), vec![
            session("Easy aerobic", &["Running/Jogging", "Brisk walking"], 30, 1.0),
            session("Cross training", &["Cycling", "Swimming"], 40, 0.8),
            session("Muscular endurance", &["Bodyweight squats", "Plank", "Step-ups"], 30, 0.7),
        ]),
        template(Goal::Endurance, Intermediate, 4, (5.0, 7.0, 8.0), vec![
            session("Long run", &["Running/Jogging"], 75, 1.0),
            session("Tempo", &["Running/Jogging", "Jump rope"], 40, 1.0),
            session("Cross training", &["Rowing", "Elliptical", "Cycling"], 50, 0.8),
            session("Muscular endurance", &["Walking lunges", "Kettlebell swings", "Plank"], 35, 0.7),
        ]),
        template(Goal::Endurance, Advanced, 5, (6.5, 9.0, 9.5), vec![
            session("Long run", &["Running/Jogging"], 110, 1.0),
            session("Tempo", &["Running/Jogging"], 45, 1.0),
            session("Intervals", &["Sprint intervals", "Box jumps", "Jumping lunges"], 40, 1.0),
            session("Cross training", &["Swimming", "Rowing", "Cycling"], 60, 0.8),
            session("Muscular endurance", &["Kettlebell swings", "Step-ups", "Burpees"], 40, 0.8),
        ]),
        // Maintenance has no advanced entry; advanced users fall back to intermediate.
        template(Goal::Maintenance, Beginner, 3, (3.5, 5.0, 6.5), vec![
            session("Balanced cardio", &["Brisk walking", "Cycling"], 40, 1.0),
            session("Functional strength", &["Farmer walks", "Bodyweight squats", "Push-ups"], 35, 0.9),
            session("Mobility", &["Yoga flow", "Stretching"], 30, 0.6),
        ]),
        template(Goal::Maintenance, Intermediate, 3, (4.5, 6.5, 8.0), vec![
            session("Cardio", &["Running/Jogging", "Cycling"], 45, 1.0),
            session("Strength", &["Squats", "Bench press", "Rows"], 50, 1.0),
            session("Functional", &["Farmer walks", "Turkish get-ups", "Kettlebell swings"], 40, 0.9),
        ]),
    ]
}

fn tier_limits() -> Vec<TierLimit> {
    vec![
        TierLimit { experience: Beginner, max_intensity: 6.5, max_sessions: 4 },
        TierLimit { experience: Intermediate, max_intensity: 8.0, max_sessions: 5 },
        TierLimit { experience: Advanced, max_intensity: 9.5, max_sessions: 6 },
    ]
}

fn sub(pairs: &[(&str, &str)]) -> Vec<Substitution> {
    pairs
        .iter()
        .map(|(from, to)| Substitution { from: from.to_string(), to: to.to_string() })
        .collect()
}

fn age_bands() -> Vec<AgeBand> {
    vec![
        AgeBand {
            name: "under_25".into(),
            min_age: 0,
            intensity_factor: 1.0,
            substitutions: Vec::new(),
            notes: s(&[
                "Recovery: generally faster, can handle higher volume",
                "Focus: build good movement patterns and habits",
                "Considerations: think in terms of long-term development",
            ]),
        },
        AgeBand {
            name: "25_to_39".into(),
            min_age: 25,
            intensity_factor: 1.0,
            substitutions: Vec::new(),
            notes: s(&[
                "Recovery: good capacity with proper sleep and nutrition",
                "Focus: peak performance and goal achievement",
                "Considerations: keep training balanced with work and life",
            ]),
        },
        AgeBand {
            name: "40_to_49".into(),
            min_age: 40,
            intensity_factor: 1.0,
            substitutions: Vec::new(),
            notes: s(&[
                "Recovery: may need longer recovery periods",
                "Focus: maintain strength and prevent age-related muscle loss",
                "Considerations: include mobility and flexibility work",
            ]),
        },
        AgeBand {
            name: "50_plus".into(),
            min_age: 50,
            intensity_factor: 0.85,
            substitutions: sub(&[
                ("Burpees", "Step-ups"),
                ("Jump squats", "Box squats"),
                ("Mountain climbers", "Incline plank holds"),
                ("Running/Jogging", "Brisk walking"),
                ("Box jumps", "Step-ups"),
                ("Jumping lunges", "Reverse lunges"),
                ("Sprint intervals", "Cycling intervals"),
                ("Jump rope", "Marching in place"),
            ]),
            notes: s(&[
                "Recovery: prioritise recovery and listen to your body",
                "Focus: functional fitness and quality of life",
                "Considerations: low-impact exercises and joint health",
            ]),
        },
    ]
}

fn experience_notes() -> Vec<ExperienceNotes> {
    vec![
        ExperienceNotes {
            experience: Beginner,
            notes: s(&[
                "Start with lower intensity and focus on form",
                "Increase intensity gradually over 4-6 weeks",
                "Allow 48-72 hours rest between sessions for the same muscle groups",
            ]),
        },
        ExperienceNotes {
            experience: Intermediate,
            notes: s(&[
                "Moderate to high intensity with proper form",
                "Apply progressive overload every 1-2 weeks",
                "Use exercise variations to prevent plateaus",
            ]),
        },
        ExperienceNotes {
            experience: Advanced,
            notes: s(&[
                "High intensity with advanced techniques",
                "Periodise training and schedule deload weeks",
                "Target specific weaknesses or goals",
            ]),
        },
    ]
}

fn general_tips() -> Vec<String> {
    s(&[
        "Drink at least 8-10 glasses of water daily",
        "Aim for 7-9 hours of quality sleep each night",
        "Warm up for 5-10 minutes before exercise",
        "Cool down with light stretching after workouts",
        "Listen to your body and rest when needed",
        "Track progress with photos, measurements or performance metrics",
        "Consider working with a qualified trainer when starting a new program",
    ])
}

fn goal_guidance() -> Vec<GoalGuidance> {
    vec![
        GoalGuidance {
            goal: Goal::WeightLoss,
            tips: s(&[
                "Focus on a sustainable caloric deficit",
                "Weigh yourself at the same time of day",
            ]),
            similarity_note: "Users with similar profiles progressed well on a steady caloric deficit; keep protein high".into(),
        },
        GoalGuidance {
            goal: Goal::MuscleGain,
            tips: s(&[
                "Prioritise protein intake and post-workout nutrition",
                "Track strength gains and progressive overload",
            ]),
            similarity_note: "Users with similar profiles responded to extra protein around training; consider a small surplus".into(),
        },
        GoalGuidance {
            goal: Goal::Endurance,
            tips: s(&[
                "Increase training volume gradually to prevent injury",
                "Schedule rest days and active recovery",
            ]),
            similarity_note: "Users with similar profiles benefited from carbohydrate-rich meals before longer sessions".into(),
        },
        GoalGuidance {
            goal: Goal::Maintenance,
            tips: s(&[
                "Keep a consistent weekly routine",
                "Follow the 80/20 rule for food choices",
            ]),
            similarity_note: "Users with similar profiles kept results with balanced, consistent meals".into(),
        },
    ]
}

/// Default reference tables.
pub fn default_rule_tables() -> RawRuleTables {
    RawRuleTables {
        templates: templates(),
        tier_limits: tier_limits(),
        age_bands: age_bands(),
        experience_notes: experience_notes(),
        general_tips: general_tips(),
        goal_guidance: goal_guidance(),
    }
}
