use crate::domain::model::CarePathway;

/// 依就醫路徑與是否為兒童選擇固定指示文字
pub fn care_instructions(pathway: CarePathway, pediatric: bool) -> &'static str {
    if pediatric {
        pediatric_instructions(pathway)
    } else {
        adult_instructions(pathway)
    }
}

fn adult_instructions(pathway: CarePathway) -> &'static str {
    match pathway {
        CarePathway::EmergencyRoom => {
            "SEEK IMMEDIATE MEDICAL ATTENTION. Go to the nearest emergency room or call emergency services (911)."
        }
        CarePathway::UrgentCare => {
            "Visit an urgent care center within 24 hours. If symptoms worsen, go to the emergency room."
        }
        CarePathway::PrimaryCare => {
            "Schedule an appointment with your primary care physician within the next few days."
        }
        CarePathway::Telehealth => {
            "Consider scheduling a telehealth appointment with a healthcare provider."
        }
        CarePathway::SelfManagement => concat!(
            "Your symptoms can likely be managed at home with rest and over-the-counter remedies. ",
            "If symptoms persist or worsen, consult a healthcare provider."
        ),
    }
}

fn pediatric_instructions(pathway: CarePathway) -> &'static str {
    match pathway {
        CarePathway::EmergencyRoom => concat!(
            "SEEK IMMEDIATE MEDICAL ATTENTION FOR YOUR CHILD. Go to the nearest pediatric emergency room or call emergency services (911). ",
            "For infants and young children, emergency symptoms require immediate professional evaluation."
        ),
        CarePathway::UrgentCare => concat!(
            "Take your child to a pediatric urgent care center within 24 hours. If symptoms worsen, go to the emergency room immediately. ",
            "Children can deteriorate quickly, so close monitoring is essential."
        ),
        CarePathway::PrimaryCare => concat!(
            "Schedule an appointment with your child's pediatrician within the next few days. ",
            "In the meantime, monitor your child's symptoms closely and ensure they stay hydrated."
        ),
        CarePathway::Telehealth => concat!(
            "Consider scheduling a telehealth appointment with your child's pediatrician. ",
            "Have a thermometer and other relevant home medical equipment ready for the consultation."
        ),
        CarePathway::SelfManagement => concat!(
            "Your child's symptoms can likely be managed at home with appropriate care. ",
            "Ensure they get plenty of rest, stay hydrated, and monitor their temperature regularly. ",
            "If symptoms persist beyond 48 hours, worsen suddenly, or if your child appears unusually lethargic, consult a healthcare provider."
        ),
    }
}
