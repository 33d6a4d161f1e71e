//! Seed content
//!
//! Default collections written to an empty local store on first read, so
//! a fresh install renders a populated site before the admin edits
//! anything. Ids are stable so re-seeding is idempotent.

use crate::models::{
    ExperienceItem, Project, QualificationCategory, QualificationItem, Resume, SkillCategory,
    SkillLevel,
};

/// Default project cards
pub fn projects() -> Vec<Project> {
    let specs: [(&str, &str, &str, &str, &[&str], &str, bool, bool); 4] = [
        (
            "Developer Portfolio",
            "https://images.example.com/portfolio.jpg",
            "https://github.com/example/portfolio",
            "https://portfolio.example.com",
            &["React", "CSS", "Responsive Design"],
            "Personal portfolio site with an embedded content admin.",
            true,
            false,
        ),
        (
            "Air Canvas",
            "https://images.example.com/air-canvas.jpg",
            "https://github.com/example/air-canvas",
            "",
            &["OpenCV", "Computer Vision", "Python"],
            "Hand-gesture recognition for touchless drawing.",
            false,
            false,
        ),
        (
            "Pocket Budget",
            "https://images.example.com/budget.jpg",
            "https://github.com/example/pocket-budget",
            "",
            &["Flutter", "SQLite", "Analytics"],
            "Personal finance tracker with spending insights.",
            false,
            false,
        ),
        (
            "Chatty",
            "https://images.example.com/chatty.jpg",
            "https://github.com/example/chatty",
            "https://chatty.example.com",
            &["Node.js", "Socket.io", "MongoDB"],
            "Real-time messaging with presence and typing indicators.",
            false,
            true,
        ),
    ];

    specs
        .iter()
        .enumerate()
        .map(
            |(index, (title, image, github, demo, tags, desc, featured, is_new))| {
                let mut project = Project::new(*title);
                project.id = format!("project-{}", index + 1);
                project.image = image.to_string();
                project.github = github.to_string();
                project.demo = demo.to_string();
                project.tags = tags.iter().map(|t| t.to_string()).collect();
                project.desc = desc.to_string();
                project.is_featured = *featured;
                project.is_new = *is_new;
                project.sort_order = index as i64;
                project
            },
        )
        .collect()
}

/// Default skill entries, frontend first
pub fn experience() -> Vec<ExperienceItem> {
    let frontend: [(&str, SkillLevel); 6] = [
        ("HTML", SkillLevel::Proficient),
        ("CSS", SkillLevel::Intermediate),
        ("JavaScript", SkillLevel::Intermediate),
        ("React", SkillLevel::Intermediate),
        ("Tailwind CSS", SkillLevel::Intermediate),
        ("Responsive Design", SkillLevel::Intermediate),
    ];
    let backend: [(&str, SkillLevel); 6] = [
        ("Node.js", SkillLevel::Intermediate),
        ("Python", SkillLevel::Intermediate),
        ("PostgreSQL", SkillLevel::Basic),
        ("REST APIs", SkillLevel::Intermediate),
        ("Docker", SkillLevel::Basic),
        ("Git", SkillLevel::Intermediate),
    ];

    let mut items = Vec::new();
    for (index, (skill, level)) in frontend.iter().enumerate() {
        let mut item = ExperienceItem::new(*skill, *level, SkillCategory::Frontend);
        item.id = format!("frontend-{}", index + 1);
        item.sort_order = items.len() as i64;
        items.push(item);
    }
    for (index, (skill, level)) in backend.iter().enumerate() {
        let mut item = ExperienceItem::new(*skill, *level, SkillCategory::Backend);
        item.id = format!("backend-{}", index + 1);
        item.sort_order = items.len() as i64;
        items.push(item);
    }
    items
}

/// Default qualification timeline entries
pub fn qualification() -> Vec<QualificationItem> {
    let education: [(&str, &str, &str); 2] = [
        (
            "B.Tech in Computer Science",
            "State Institute of Technology",
            "2020 - 2024",
        ),
        ("Senior Secondary Education", "Central High School", "2020"),
    ];
    let experience: [(&str, &str, &str); 2] = [
        ("Software Engineering Intern", "Acme Labs", "May 2023 - Aug 2023"),
        ("Web Development Trainee", "Dev Bootcamp", "2022 (3 months)"),
    ];

    let mut items = Vec::new();
    for (index, (title, subtitle, period)) in education.iter().enumerate() {
        let mut item =
            QualificationItem::new(*title, *subtitle, *period, QualificationCategory::Education);
        item.id = format!("education-{}", index + 1);
        item.sort_order = items.len() as i64;
        items.push(item);
    }
    for (index, (title, subtitle, period)) in experience.iter().enumerate() {
        let mut item =
            QualificationItem::new(*title, *subtitle, *period, QualificationCategory::Experience);
        item.id = format!("experience-{}", index + 1);
        item.sort_order = items.len() as i64;
        items.push(item);
    }
    items
}

/// Default resume record (no hosted file until the admin uploads one)
pub fn resume() -> Resume {
    Resume::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_project_ids_are_unique_and_ordered() {
        let projects = projects();
        let mut ids: Vec<_> = projects.iter().map(|p| p.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), projects.len());

        for (index, project) in projects.iter().enumerate() {
            assert_eq!(project.sort_order, index as i64);
        }
    }

    #[test]
    fn test_seed_experience_covers_both_categories() {
        let items = experience();
        assert!(items.iter().any(|i| i.category == SkillCategory::Frontend));
        assert!(items.iter().any(|i| i.category == SkillCategory::Backend));
        for item in &items {
            assert!(item.validate().is_ok());
        }
    }

    #[test]
    fn test_seed_qualification_is_valid() {
        for item in qualification() {
            assert!(item.validate().is_ok());
        }
    }
}
