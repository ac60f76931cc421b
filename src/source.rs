//! Rastreo de ubicaciones originales en código fuente.
//!
//! Los distintos objetos internos que el compilador construye
//! deben llevar cuenta de posiciones o rangos de ubicaciones en
//! el código fuente original, lo cual permite determinar el punto
//! exacto en donde ocurre un error. La expresión de entrada es una
//! única línea, por lo cual las posiciones son offsets en bytes.

use std::{
    fmt::{self, Debug, Display, Formatter},
    ops::Range,
    rc::Rc,
};

/// Un objeto cualquiera con una posición original asociada.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located<T> {
    location: Location,
    value: T,
}

impl<T> Located<T> {
    /// Obtiene el valor.
    pub fn val(&self) -> &T {
        &self.value
    }

    /// Obtiene la ubicación.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Descarta la ubicación y toma ownership del valor.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Construye a partir de un valor y una ubicación.
    pub fn at(value: T, location: Location) -> Self {
        Located { value, location }
    }
}

impl<T> AsRef<T> for Located<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

/// Texto original junto a un nombre para diagnósticos.
pub struct Source {
    name: String,
    text: String,
}

impl Source {
    /// Toma ownership de un texto fuente.
    pub fn new<N, T>(name: N, text: T) -> Rc<Self>
    where
        N: Into<String>,
        T: Into<String>,
    {
        Rc::new(Source {
            name: name.into(),
            text: text.into(),
        })
    }

    /// Texto completo.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl PartialEq for Source {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.text == other.text
    }
}

impl Eq for Source {}

/// Una ubicación está conformada por un origen y un rango de bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Location {
    from: Rc<Source>,
    position: Range<usize>,
}

impl Location {
    /// Construye una ubicación dentro de `from`.
    ///
    /// Los offsets se recortan a la longitud del texto, de forma que
    /// la ubicación del fin de entrada es `len..len`.
    pub fn new(from: &Rc<Source>, position: Range<usize>) -> Self {
        let len = from.text.len();
        Location {
            from: Rc::clone(from),
            position: position.start.min(len)..position.end.min(len),
        }
    }

    /// Offset en bytes del inicio.
    pub fn start(&self) -> usize {
        self.position.start
    }

    /// Offset en bytes del fin (exclusivo).
    pub fn end(&self) -> usize {
        self.position.end
    }

    /// Origen al que pertenece esta ubicación.
    pub fn source(&self) -> &Source {
        &self.from
    }

    /// Número de columna (en caracteres, desde 1) del inicio.
    pub fn column(&self) -> usize {
        column_of(&self.from.text, self.position.start)
    }

    /// Cantidad de caracteres cubiertos, al menos uno.
    pub fn width(&self) -> usize {
        let start = self.column();
        let end = column_of(&self.from.text, self.position.end);
        (end - start).max(1)
    }
}

impl Display for Location {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:1:{}", self.from.name, self.column())
    }
}

impl Debug for Location {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}..{}", self.position.start, self.position.end)
    }
}

fn column_of(text: &str, offset: usize) -> usize {
    // Un offset inválido en medio de un carácter multibyte cuenta hasta ese carácter
    text.char_indices().take_while(|&(i, _)| i < offset).count() + 1
}
