use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Zero-based page request, as sent in `?page=&size=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
}

fn default_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Builds a request with the size clamped into `1..=MAX_PAGE_SIZE`.
    /// A zero size falls back to the default.
    pub fn new(page: u32, size: u32) -> Self {
        let size = match size {
            0 => DEFAULT_PAGE_SIZE,
            s => s.min(MAX_PAGE_SIZE),
        };
        Self { page, size }
    }

    pub fn normalized(self) -> Self {
        Self::new(self.page, self.size)
    }

    pub fn offset(&self) -> usize {
        self.page as usize * self.size as usize
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            size: self.size,
        }
    }

    /// Slices one page out of an already ordered sequence.
    pub fn paginate<T, I>(&self, items: I) -> Page<T>
    where
        I: ExactSizeIterator<Item = T>,
    {
        let total_elements = items.len() as u64;
        let content = items.skip(self.offset()).take(self.size as usize).collect();
        Page {
            content,
            number: self.page,
            size: self.size,
            total_elements,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u32 {
        if self.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(self.size as u64) as u32
    }

    pub fn has_previous(&self) -> bool {
        self.number > 0
    }

    pub fn has_next(&self) -> bool {
        self.number.saturating_add(1) < self.total_pages()
    }
}
