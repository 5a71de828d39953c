// SPDX-License-Identifier: AGPL-3.0-or-later
//! Sample lesson mixing LaTeX structure, Markdown-friendly text and display math

/// Lesson on solving quadratic equations by factoring
pub const SAMPLE_LESSON: &str = r"
\section*{Introduction}

\vspace{1em}

Welcome to this lesson on solving quadratic equations by factoring! Factoring is one of the most efficient ways to solve quadratic equations, and it's a skill you'll use often in algebra and beyond. By breaking down the equation into simpler expressions, you'll learn how to find the roots of the equation quickly and effectively.

\vspace{1em}

\section*{Key Concepts Covered}

\vspace{1em}

\begin{itemize}
  \item \textbf{Understanding Quadratic Equations}: What are they and why are they important?
  \item \textbf{Factoring Basics}: Breaking down quadratic equations into their factors.
  \item \textbf{Zero-Product Property}: How setting each factor to zero helps find the solution.
  \item \textbf{Steps to Solve}: A step-by-step guide to solving quadratic equations by factoring.
\end{itemize}

\vspace{1em}

\section*{Step-by-Step Guide}

\vspace{1em}

\begin{enumerate}
  \item \textbf{Rewrite the equation in standard form:}
    Example:
    \[
    ax^2 + bx + c = 0
    \]
    \[
    0a x^2 + bx + c = 0
    \]

  \item \textbf{Factor the quadratic expression:}
    Example:
    \[
    x^2 + 5x + 6 = 0
    \]
    Factors to:
    \[
    (x + 2)(x + 3) = 0
    \]

  \item \textbf{Apply the Zero-Product Property:}
    Set each factor equal to zero:
    \[
    x + 2 = 0 \quad \text{or} \quad x + 3 = 0
    \]

  \item \textbf{Solve for \( x \):}
    \[
    x = -2 \quad \text{or} \quad x = -3
    \]
\end{enumerate}
";
