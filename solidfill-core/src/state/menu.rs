//! Menu categories and items

/// Menu category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuCategory {
    Main,
    Vacuum,
}

/// Items of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MainMenuItem {
    Back,
    Start,
    SetVacuum,
}

/// Items of the vacuum menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VacuumMenuItem {
    Back,
    SetTop,
    SetBottom,
}

impl MainMenuItem {
    pub const ALL: [MainMenuItem; 3] = [Self::Back, Self::Start, Self::SetVacuum];

    pub fn index(self) -> u8 {
        self as u8
    }
}

impl VacuumMenuItem {
    pub const ALL: [VacuumMenuItem; 3] = [Self::Back, Self::SetTop, Self::SetBottom];

    /// Sensor edited by this item
    pub fn sensor_index(self) -> Option<usize> {
        match self {
            VacuumMenuItem::Back => None,
            VacuumMenuItem::SetTop => Some(0),
            VacuumMenuItem::SetBottom => Some(1),
        }
    }
}

/// Selected item, typed by category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuItem {
    Main(MainMenuItem),
    Vacuum(VacuumMenuItem),
}

impl MenuCategory {
    /// Number of items in this category
    pub fn item_count(self) -> u8 {
        match self {
            MenuCategory::Main => MainMenuItem::ALL.len() as u8,
            MenuCategory::Vacuum => VacuumMenuItem::ALL.len() as u8,
        }
    }

    /// Item label as shown on screen
    ///
    /// `active` swaps the Start label to Stop.
    pub fn label(self, index: u8, active: bool) -> &'static str {
        match (self, index) {
            (MenuCategory::Main, 0) => "Back",
            (MenuCategory::Main, 1) if active => "Stop",
            (MenuCategory::Main, 1) => "Start",
            (MenuCategory::Main, 2) => "Set Vacuum",
            (MenuCategory::Vacuum, 0) => "Back",
            (MenuCategory::Vacuum, 1) => "Set Top",
            (MenuCategory::Vacuum, 2) => "Set Bottom",
            _ => "",
        }
    }
}

/// Nested menu state: category plus selected index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Menu {
    category: MenuCategory,
    item: u8,
}

impl Menu {
    pub const fn new() -> Self {
        Self::at(MenuCategory::Main, 0)
    }

    pub const fn at(category: MenuCategory, item: u8) -> Self {
        Self { category, item }
    }

    pub fn category(&self) -> MenuCategory {
        self.category
    }

    pub fn item_index(&self) -> u8 {
        self.item
    }

    /// Typed view of the selected item
    pub fn selected(&self) -> MenuItem {
        let index = usize::from(self.item);
        match self.category {
            MenuCategory::Main => {
                MenuItem::Main(MainMenuItem::ALL[index.min(MainMenuItem::ALL.len() - 1)])
            }
            MenuCategory::Vacuum => {
                MenuItem::Vacuum(VacuumMenuItem::ALL[index.min(VacuumMenuItem::ALL.len() - 1)])
            }
        }
    }

    /// Move the selection by one step in the direction of `turn`
    ///
    /// Saturates at both ends.
    pub fn scroll(&mut self, turn: i8) {
        let last = self.category.item_count() - 1;
        self.item = match turn.signum() {
            1 => (self.item + 1).min(last),
            -1 => self.item.saturating_sub(1),
            _ => self.item,
        };
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}
