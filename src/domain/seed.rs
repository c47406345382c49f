//! Demo users and catalog the marketplace starts with.

use super::model::{Category, Condition, Listing, User};

fn user(id: &str, name: &str, email: &str, seed: &str, is_verified: bool, rating: f32) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        avatar: format!("https://api.dicebear.com/7.x/avataaars/svg?seed={}", seed),
        is_verified,
        rating,
    }
}

pub fn demo_users() -> Vec<User> {
    vec![
        user("u1", "Arjun Mehta", "arjun.m@nitrr.ac.in", "Arjun", true, 4.8),
        user("u2", "Sneha Reddy", "sneha.r@nitrr.ac.in", "Sneha", true, 4.9),
        user("u3", "Rahul Verma", "rahul.v@nitrr.ac.in", "Rahul", false, 4.2),
    ]
}

#[allow(clippy::too_many_arguments)]
fn listing(
    id: &str,
    owner_id: &str,
    title: &str,
    description: &str,
    category: Category,
    price_per_day: u64,
    original_price: u64,
    image: &str,
    is_available: bool,
    location: &str,
    condition: Condition,
) -> Listing {
    Listing {
        id: id.to_string(),
        owner_id: owner_id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        category,
        price_per_day,
        original_price,
        image_url: format!(
            "https://images.unsplash.com/{}?auto=format&fit=crop&q=80&w=800",
            image
        ),
        is_available,
        location: location.to_string(),
        condition,
    }
}

pub fn demo_catalog() -> Vec<Listing> {
    vec![
        listing(
            "i1",
            "u2",
            "Casio fx-991EX Scientific Calculator",
            "Perfect condition, essential for Engineering exams. Comes with cover.",
            Category::Electronics,
            40,
            1200,
            "photo-1574607383476-f517f260d30b",
            true,
            "Library Pickup Zone",
            Condition::LikeNew,
        ),
        listing(
            "i2",
            "u3",
            "Formal Black Shoes (Size 9)",
            "Worn once for a presentation. Clean and polished. Great for interviews.",
            Category::Clothing,
            150,
            2500,
            "photo-1449247709967-d4461a6a6103",
            true,
            "Hostel H5 Main Gate",
            Condition::Good,
        ),
        listing(
            "i3",
            "u2",
            "Chemistry Lab Coat (Size M)",
            "Standard white lab coat. Freshly washed.",
            Category::LabEquipment,
            30,
            600,
            "photo-1576086213369-97a306d36557",
            true,
            "Chemistry Dept Lobby",
            Condition::Good,
        ),
        listing(
            "i4",
            "u3",
            "Badminton Racket (Yonex)",
            "Carbon fiber racket, lightweight. Good tension.",
            Category::Sports,
            80,
            3000,
            "photo-1626225967045-2c76b2af6432",
            false,
            "Sports Complex",
            Condition::Fair,
        ),
        listing(
            "i5",
            "u2",
            "Introduction to Algorithms (CLRS)",
            "The bible of algorithms. Hardcover, 3rd Edition.",
            Category::Books,
            50,
            4500,
            "photo-1544716278-ca5e3f4abd8c",
            true,
            "Main Canteen",
            Condition::Good,
        ),
    ]
}
