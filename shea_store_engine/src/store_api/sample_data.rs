//! The demonstration catalog loaded into an empty store.
use shea_common::Cents;

use crate::db_types::{NewCategory, NewProduct};

pub const PLACEHOLDER_IMAGE: &str = "/api/placeholder/400/400";

pub struct SampleProduct {
    /// Index into [`sample_categories`].
    pub category: usize,
    pub product: NewProduct,
}

pub fn sample_categories() -> Vec<NewCategory> {
    vec![
        NewCategory::new("Beurre de Karité Pur", "karite-pur")
            .with_description("Beurre de karité 100% naturel et non raffiné"),
        NewCategory::new("Produits Parfumés", "karite-parfume")
            .with_description("Beurre de karité enrichi aux huiles essentielles"),
        NewCategory::new("Gamme Bébé", "karite-bebe").with_description("Produits spécialement formulés pour les bébés"),
        NewCategory::new("Soins Anti-Âge", "karite-anti-age")
            .with_description("Formules enrichies pour lutter contre le vieillissement"),
    ]
}

fn product(name: &str, description: &str, price: i64, stock: i64, rating: f64, reviews: i64) -> NewProduct {
    NewProduct::new(name, Cents::from(price))
        .with_description(description)
        .with_stock(stock)
        .with_image(PLACEHOLDER_IMAGE)
        .with_rating(rating, reviews)
}

pub fn sample_products() -> Vec<SampleProduct> {
    vec![
        SampleProduct {
            category: 0,
            product: product(
                "Beurre de Karité Bio Premium",
                "Beurre de karité 100% naturel et biologique du Burkina Faso. Non raffiné, riche en vitamines A, E et F. \
                 Idéal pour hydrater et nourrir tous types de peau.",
                2499,
                50,
                4.8,
                156,
            )
            .with_original_price(Cents::from(2999))
            .featured(),
        },
        SampleProduct {
            category: 1,
            product: product(
                "Beurre de Karité Parfumé Vanille",
                "Beurre de karité enrichi aux extraits naturels de vanille bourbon. Texture crémeuse et parfum délicat \
                 pour une expérience sensorielle unique.",
                2299,
                35,
                4.6,
                89,
            )
            .featured(),
        },
        SampleProduct {
            category: 2,
            product: product(
                "Beurre de Karité Bébé Doux",
                "Formule extra-douce spécialement conçue pour les bébés. Hypoallergénique, sans parfum, testé \
                 dermatologiquement pour les peaux sensibles.",
                1999,
                0,
                4.9,
                234,
            )
            .with_original_price(Cents::from(2499))
            .featured(),
        },
        SampleProduct {
            category: 3,
            product: product(
                "Beurre de Karité Anti-Âge",
                "Enrichi en vitamines E et collagène naturel. Formule avancée pour réduire les signes de l'âge et \
                 maintenir l'élasticité de la peau.",
                3499,
                25,
                4.7,
                67,
            )
            .featured(),
        },
        SampleProduct {
            category: 1,
            product: product(
                "Karité Lavande Relaxant",
                "Beurre de karité infusé à l'huile essentielle de lavande. Propriétés relaxantes et apaisantes pour un \
                 moment de détente absolue.",
                2699,
                42,
                4.5,
                78,
            ),
        },
        SampleProduct {
            category: 1,
            product: product(
                "Karité Cacao Gourmand",
                "Texture riche et parfum gourmand de cacao. Nourrit intensément les peaux très sèches avec un parfum \
                 réconfortant.",
                2399,
                38,
                4.4,
                92,
            ),
        },
        SampleProduct {
            category: 2,
            product: product(
                "Karité Bébé Bio Certifié",
                "Certification bio Ecocert. Formule ultra-pure pour les nourrissons dès la naissance. Texture légère et \
                 absorption rapide.",
                2899,
                20,
                4.8,
                145,
            ),
        },
        SampleProduct {
            category: 3,
            product: product(
                "Sérum Karité Régénérant",
                "Concentré anti-âge au karité et acide hyaluronique. Stimule la régénération cellulaire pour une peau \
                 visiblement plus jeune.",
                4299,
                15,
                4.6,
                34,
            ),
        },
    ]
}
