// src/catalog.rs
//
// Static content catalog: sample learning paths, lessons, vulnerable labs
// and achievements, each with EN/ES/EU translation bundles. Built once at
// first use and never mutated; progress records join against these by id.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::OnceLock;

use crate::content::{
    Achievement, AchievementCriteria, AchievementTranslation, AchievementType, ContentSection,
    Difficulty, Exercise, ExerciseKind, LabTranslation, LearningPath, Lesson, LessonContent,
    LessonKind, LessonTranslation, PathTranslation, VulnerableLab,
};
use crate::models::Language;

pub struct Catalog {
    pub paths: Vec<LearningPath>,
    pub lessons: Vec<Lesson>,
    pub labs: Vec<VulnerableLab>,
    pub achievements: Vec<Achievement>,
}

static CATALOG: OnceLock<Catalog> = OnceLock::new();

pub fn catalog() -> &'static Catalog {
    CATALOG.get_or_init(|| Catalog {
        paths: seed_paths(),
        lessons: seed_lessons(),
        labs: seed_labs(),
        achievements: seed_achievements(),
    })
}

// --- Lookups ---

pub fn learning_paths() -> &'static [LearningPath] {
    &catalog().paths
}

pub fn learning_path(id: &str) -> Option<&'static LearningPath> {
    catalog().paths.iter().find(|p| p.id == id)
}

pub fn learning_path_by_slug(slug: &str) -> Option<&'static LearningPath> {
    catalog().paths.iter().find(|p| p.slug == slug)
}

pub fn lessons() -> &'static [Lesson] {
    &catalog().lessons
}

pub fn lesson(id: &str) -> Option<&'static Lesson> {
    catalog().lessons.iter().find(|l| l.id == id)
}

pub fn lesson_by_slug(slug: &str) -> Option<&'static Lesson> {
    catalog().lessons.iter().find(|l| l.slug == slug)
}

/// Lessons belonging to a path, in curriculum order.
pub fn lessons_for_path(path_id: &str) -> Vec<&'static Lesson> {
    let mut out: Vec<&Lesson> = catalog()
        .lessons
        .iter()
        .filter(|l| l.path_id == path_id)
        .collect();
    out.sort_by_key(|l| l.order);
    out
}

pub fn vulnerable_labs() -> &'static [VulnerableLab] {
    &catalog().labs
}

pub fn vulnerable_lab(id: &str) -> Option<&'static VulnerableLab> {
    catalog().labs.iter().find(|l| l.id == id)
}

pub fn vulnerable_lab_by_slug(slug: &str) -> Option<&'static VulnerableLab> {
    catalog().labs.iter().find(|l| l.slug == slug)
}

pub fn achievements() -> &'static [Achievement] {
    &catalog().achievements
}

pub fn achievement(id: &str) -> Option<&'static Achievement> {
    catalog().achievements.iter().find(|a| a.id == id)
}

// --- Seed data ---

fn seeded_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid seed timestamp")
}

fn seed_paths() -> Vec<LearningPath> {
    let created = seeded_at();
    vec![
        LearningPath {
            id: "path-beginner-web-security".into(),
            slug: "beginner-web-security".into(),
            difficulty: Difficulty::Beginner,
            estimated_hours: 20,
            is_active: true,
            created_at: created,
            updated_at: created,
            lessons: vec![
                "lesson-intro-cybersec".into(),
                "lesson-web-basics".into(),
                "lesson-first-vuln".into(),
            ],
            translations: vec![
                PathTranslation {
                    language: Language::En,
                    name: "Web Security Fundamentals".into(),
                    description: "Learn the basics of web application security and common vulnerabilities.".into(),
                },
                PathTranslation {
                    language: Language::Es,
                    name: "Fundamentos de Seguridad Web".into(),
                    description: "Aprende los conceptos básicos de seguridad en aplicaciones web y vulnerabilidades comunes.".into(),
                },
                PathTranslation {
                    language: Language::Eu,
                    name: "Web Segurtasunaren Oinarriak".into(),
                    description: "Ikasi web aplikazioen segurtasunaren oinarriak eta ohiko ahultasunak.".into(),
                },
            ],
        },
        LearningPath {
            id: "path-intermediate-pentesting".into(),
            slug: "intermediate-pentesting".into(),
            difficulty: Difficulty::Intermediate,
            estimated_hours: 40,
            is_active: true,
            created_at: created,
            updated_at: created,
            lessons: vec![
                "lesson-sql-injection".into(),
                "lesson-xss-attacks".into(),
                "lesson-csrf-protection".into(),
            ],
            translations: vec![
                PathTranslation {
                    language: Language::En,
                    name: "Penetration Testing Essentials".into(),
                    description: "Master intermediate penetration testing techniques and methodologies.".into(),
                },
                PathTranslation {
                    language: Language::Es,
                    name: "Fundamentos de Pentesting".into(),
                    description: "Domina las técnicas y metodologías intermedias de pentesting.".into(),
                },
                PathTranslation {
                    language: Language::Eu,
                    name: "Pentesting Oinarriak".into(),
                    description: "Menderatu pentesting teknika eta metodologia ertainak.".into(),
                },
            ],
        },
        LearningPath {
            id: "path-advanced-exploitation".into(),
            slug: "advanced-exploitation".into(),
            difficulty: Difficulty::Advanced,
            estimated_hours: 60,
            is_active: true,
            created_at: created,
            updated_at: created,
            lessons: vec![
                "lesson-buffer-overflow".into(),
                "lesson-privilege-escalation".into(),
                "lesson-advanced-persistence".into(),
            ],
            translations: vec![
                PathTranslation {
                    language: Language::En,
                    name: "Advanced Exploitation Techniques".into(),
                    description: "Learn advanced exploitation methods and post-exploitation techniques.".into(),
                },
                PathTranslation {
                    language: Language::Es,
                    name: "Técnicas Avanzadas de Explotación".into(),
                    description: "Aprende métodos avanzados de explotación y técnicas post-explotación.".into(),
                },
                PathTranslation {
                    language: Language::Eu,
                    name: "Ustiapen Teknika Aurreratuak".into(),
                    description: "Ikasi ustiapen metodo aurreratuak eta post-ustiapen teknikak.".into(),
                },
            ],
        },
    ]
}

fn seed_lessons() -> Vec<Lesson> {
    let created = seeded_at();
    vec![
        Lesson {
            id: "lesson-intro-cybersec".into(),
            slug: "introduction-to-cybersecurity".into(),
            path_id: "path-beginner-web-security".into(),
            order: 1,
            difficulty: Difficulty::Beginner,
            estimated_duration: 45,
            is_active: true,
            created_at: created,
            updated_at: created,
            translations: vec![
                LessonTranslation {
                    language: Language::En,
                    title: "Introduction to Cybersecurity".into(),
                    description: "Learn the fundamental concepts of cybersecurity and why it matters.".into(),
                    content: LessonContent {
                        kind: LessonKind::Theory,
                        sections: vec![
                            ContentSection::Text {
                                id: "sec-intro-what-en".into(),
                                title: "What is Cybersecurity?".into(),
                                body: "Cybersecurity is the practice of protecting systems, networks, and programs from digital attacks...".into(),
                            },
                            ContentSection::Video {
                                id: "sec-intro-video-en".into(),
                                title: "Cybersecurity Overview".into(),
                                url: "https://example.com/video/cybersec-intro".into(),
                                duration_seconds: None,
                            },
                        ],
                        exercises: Vec::new(),
                        quiz: None,
                    },
                },
                LessonTranslation {
                    language: Language::Es,
                    title: "Introducción a la Ciberseguridad".into(),
                    description: "Aprende los conceptos fundamentales de la ciberseguridad y por qué es importante.".into(),
                    content: LessonContent {
                        kind: LessonKind::Theory,
                        sections: vec![ContentSection::Text {
                            id: "sec-intro-what-es".into(),
                            title: "¿Qué es la Ciberseguridad?".into(),
                            body: "La ciberseguridad es la práctica de proteger sistemas, redes y programas de ataques digitales...".into(),
                        }],
                        exercises: Vec::new(),
                        quiz: None,
                    },
                },
                LessonTranslation {
                    language: Language::Eu,
                    title: "Zibersegurtasunaren Sarrera".into(),
                    description: "Ikasi zibersegurtasunaren oinarrizko kontzeptuak eta zergatik den garrantzitsua.".into(),
                    content: LessonContent {
                        kind: LessonKind::Theory,
                        sections: vec![ContentSection::Text {
                            id: "sec-intro-what-eu".into(),
                            title: "Zer da Zibersegurtasuna?".into(),
                            body: "Zibersegurtasuna sistemak, sareak eta programak eraso digitaletatik babesteko praktika da...".into(),
                        }],
                        exercises: Vec::new(),
                        quiz: None,
                    },
                },
            ],
        },
        Lesson {
            id: "lesson-sql-injection".into(),
            slug: "sql-injection-attacks".into(),
            path_id: "path-intermediate-pentesting".into(),
            order: 1,
            difficulty: Difficulty::Intermediate,
            estimated_duration: 90,
            is_active: true,
            created_at: created,
            updated_at: created,
            translations: vec![LessonTranslation {
                language: Language::En,
                title: "SQL Injection Attacks".into(),
                description: "Master SQL injection techniques and learn how to identify and exploit SQL vulnerabilities.".into(),
                content: LessonContent {
                    kind: LessonKind::Practical,
                    sections: vec![
                        ContentSection::Text {
                            id: "sec-sqli-understanding".into(),
                            title: "Understanding SQL Injection".into(),
                            body: "SQL injection is a code injection technique that exploits vulnerabilities in database queries...".into(),
                        },
                        ContentSection::Code {
                            id: "sec-sqli-example".into(),
                            title: "Basic SQL Injection Example".into(),
                            code: "SELECT * FROM users WHERE username = 'admin' OR '1'='1' --".into(),
                            language: Some("sql".into()),
                        },
                    ],
                    exercises: vec![Exercise {
                        id: "ex-sqli-find".into(),
                        kind: ExerciseKind::Practical,
                        title: "Find the SQL Injection".into(),
                        description: "Identify and exploit the SQL injection vulnerability in the login form.".into(),
                        instructions: "1. Navigate to the login page\n2. Try different SQL injection payloads\n3. Extract user data".into(),
                        solution: None,
                        hints: vec![
                            "Try using single quotes".into(),
                            "Look for error messages".into(),
                            "Use UNION SELECT".into(),
                        ],
                    }],
                    quiz: None,
                },
            }],
        },
    ]
}

fn seed_labs() -> Vec<VulnerableLab> {
    let created = seeded_at();
    vec![
        VulnerableLab {
            id: "lab-sql-injection-basic".into(),
            slug: "sql-injection-basic".into(),
            difficulty: Difficulty::Beginner,
            vulnerability_types: vec!["SQL Injection".into(), "Authentication Bypass".into()],
            is_active: true,
            created_at: created,
            updated_at: created,
            docker_image: Some("cyberlearn/sqli-basic:latest".into()),
            translations: vec![
                LabTranslation {
                    language: Language::En,
                    name: "Basic SQL Injection Lab".into(),
                    description: "Practice SQL injection attacks on a vulnerable login form.".into(),
                    hints: vec![
                        "Try using single quotes to break the query".into(),
                        "Look for SQL error messages".into(),
                        "Use OR conditions to bypass authentication".into(),
                    ],
                },
                LabTranslation {
                    language: Language::Es,
                    name: "Laboratorio Básico de Inyección SQL".into(),
                    description: "Practica ataques de inyección SQL en un formulario de login vulnerable.".into(),
                    hints: vec![
                        "Intenta usar comillas simples para romper la consulta".into(),
                        "Busca mensajes de error SQL".into(),
                        "Usa condiciones OR para eludir la autenticación".into(),
                    ],
                },
            ],
        },
        VulnerableLab {
            id: "lab-xss-reflected".into(),
            slug: "xss-reflected".into(),
            difficulty: Difficulty::Intermediate,
            vulnerability_types: vec!["Cross-Site Scripting".into(), "Reflected XSS".into()],
            is_active: true,
            created_at: created,
            updated_at: created,
            docker_image: Some("cyberlearn/xss-reflected:latest".into()),
            translations: vec![LabTranslation {
                language: Language::En,
                name: "Reflected XSS Challenge".into(),
                description: "Exploit reflected XSS vulnerabilities in search functionality.".into(),
                hints: vec![
                    "Check the search parameter in the URL".into(),
                    "Try injecting JavaScript code".into(),
                    "Look for places where input is reflected".into(),
                ],
            }],
        },
    ]
}

fn seed_achievements() -> Vec<Achievement> {
    let created = seeded_at();
    vec![
        Achievement {
            id: "achievement-first-lesson".into(),
            slug: "first-lesson-completed".into(),
            kind: AchievementType::LessonCompletion,
            criteria: AchievementCriteria::LessonCompletion {
                lessons_completed: 1,
            },
            is_active: true,
            created_at: created,
            translations: vec![
                AchievementTranslation {
                    language: Language::En,
                    name: "First Steps".into(),
                    description: "Completed your first cybersecurity lesson!".into(),
                },
                AchievementTranslation {
                    language: Language::Es,
                    name: "Primeros Pasos".into(),
                    description: "¡Completaste tu primera lección de ciberseguridad!".into(),
                },
                AchievementTranslation {
                    language: Language::Eu,
                    name: "Lehen Urratsak".into(),
                    description: "Zure lehen zibersegurtasun ikasgaia osatu duzu!".into(),
                },
            ],
        },
        Achievement {
            id: "achievement-sql-master".into(),
            slug: "sql-injection-master".into(),
            kind: AchievementType::SkillMastery,
            criteria: AchievementCriteria::SkillMastery {
                skill_type: "sql-injection".into(),
                labs_completed: 5,
            },
            is_active: true,
            created_at: created,
            translations: vec![
                AchievementTranslation {
                    language: Language::En,
                    name: "SQL Injection Master".into(),
                    description: "Mastered SQL injection techniques by completing 5 labs!".into(),
                },
                AchievementTranslation {
                    language: Language::Es,
                    name: "Maestro de Inyección SQL".into(),
                    description: "¡Dominaste las técnicas de inyección SQL completando 5 laboratorios!".into(),
                },
            ],
        },
    ]
}
